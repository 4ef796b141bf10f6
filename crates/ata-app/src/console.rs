//! Terminal stand-ins for the browser speech APIs and the chat panel.

use async_trait::async_trait;

use ata_assistant::voice::strip_markup;
use ata_assistant::{AssistantError, SpeechCapture, SpeechSynthesizer, Utterance};

/// "Speaks" replies by printing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeaker;

#[async_trait]
impl SpeechSynthesizer for ConsoleSpeaker {
    fn name(&self) -> &str {
        "console"
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), AssistantError> {
        println!("🔊 [{} x{}] {}", utterance.lang, utterance.rate, utterance.text);
        Ok(())
    }
}

/// Capture backed by the keyboard: transcripts are typed with `/say`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineCapture;

#[async_trait]
impl SpeechCapture for LineCapture {
    fn name(&self) -> &str {
        "line"
    }

    async fn start(&self, lang: &str) -> Result<(), AssistantError> {
        tracing::debug!(lang, "Line capture started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), AssistantError> {
        tracing::debug!("Line capture stopped");
        Ok(())
    }
}

/// Render a chat fragment for the terminal: `<br>` becomes a line break,
/// other tags are dropped.
pub fn render(html: &str) -> String {
    html.split("<br>")
        .map(strip_markup)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Mic,
    Say(String),
    Comment(String),
    Recommend,
    History,
    Quit,
    Text(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "/toggle" => Command::Toggle,
            "/mic" => Command::Mic,
            "/say" => Command::Say(rest.to_string()),
            "/comment" => Command::Comment(rest.to_string()),
            "/recommend" => Command::Recommend,
            "/history" => Command::History,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Text(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_breaks_lines() {
        let out = render("Próximos eventos:<br><br><strong>15/06:</strong> Reunião de Pais");
        assert_eq!(out, "Próximos eventos:\n\n15/06: Reunião de Pais");
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/toggle"), Command::Toggle);
        assert_eq!(Command::parse(" /mic "), Command::Mic);
        assert_eq!(
            Command::parse("/say quais as notícias"),
            Command::Say("quais as notícias".to_string())
        );
        assert_eq!(
            Command::parse("/comment  Adorei!"),
            Command::Comment("Adorei!".to_string())
        );
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/recommend"), Command::Recommend);
    }

    #[test]
    fn test_parse_free_text() {
        assert_eq!(
            Command::parse("traduzir biblioteca"),
            Command::Text("traduzir biblioteca".to_string())
        );
        assert_eq!(Command::parse("/desconhecido"), Command::Text("/desconhecido".to_string()));
    }

    #[tokio::test]
    async fn test_console_adapters_succeed() {
        assert!(LineCapture.start("pt-BR").await.is_ok());
        assert!(LineCapture.stop().await.is_ok());
        let utterance = Utterance {
            text: "olá".to_string(),
            lang: "pt-BR".to_string(),
            rate: 1.0,
        };
        assert!(ConsoleSpeaker.speak(utterance).await.is_ok());
    }
}
