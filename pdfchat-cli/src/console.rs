//! Interactive question loop.
//!
//! [`run_chat`] reads questions until the user types `sair`, `exit` or `quit`
//! (any case) or closes the input. Each question is answered before the next
//! line is read, and a failed answer is reported without ending the session.

use std::io::Write;

use async_trait::async_trait;
use pdfchat_rag::QaService;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use tracing::warn;

const PROMPT: &str = "Você: ";
const EXIT_COMMANDS: [&str; 3] = ["sair", "exit", "quit"];

/// Something that answers one question at a time.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> pdfchat_rag::Result<String>;
}

#[async_trait]
impl Answerer for QaService {
    async fn answer(&self, question: &str) -> pdfchat_rag::Result<String> {
        QaService::answer(self, question).await
    }
}

/// A source of input lines.
pub trait LineReader {
    /// Show `prompt` and read one line.
    ///
    /// Returns `Ok(None)` when the input is closed or interrupted.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                record_history(self.history_mut(), &line);
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Add a non-blank line to `history`. Failures are logged and otherwise ignored.
fn record_history<H: History + ?Sized>(history: &mut H, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = history.add(line) {
        warn!(error = %e, "failed to record history entry");
    }
}

fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.iter().any(|command| input.eq_ignore_ascii_case(command))
}

fn rule(c: char) -> String {
    std::iter::repeat_n(c, 50).collect()
}

/// Run the chat loop until an exit command or end of input.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails; answering
/// errors are printed and the loop continues.
pub async fn run_chat<A, R, W>(answerer: &A, reader: &mut R, out: &mut W) -> anyhow::Result<()>
where
    A: Answerer + ?Sized,
    R: LineReader,
    W: Write,
{
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Chat com Documentos PDF - Sistema RAG")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "Digite suas perguntas sobre o documento.")?;
    writeln!(out, "Digite 'sair', 'exit' ou 'quit' para encerrar.\n")?;
    out.flush()?;

    loop {
        let Some(line) = reader.read_line(PROMPT)? else {
            break;
        };
        let question = line.trim();
        if is_exit_command(question) {
            break;
        }

        writeln!(out, "\nBuscando informações...\n")?;
        out.flush()?;

        match answerer.answer(question).await {
            Ok(answer) => {
                writeln!(out, "Assistente: {answer}\n")?;
                writeln!(out, "{}\n", rule('-'))?;
            }
            Err(e) => {
                warn!(error = %e, "failed to answer question");
                writeln!(out, "Erro ao processar pergunta: {e}\n")?;
                writeln!(out, "Tente novamente.\n")?;
            }
        }
        out.flush()?;
    }

    writeln!(out, "Encerrando o assistente. Até logo!")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rustyline::history::MemHistory;

    use super::*;

    #[test]
    fn blank_lines_are_not_recorded() {
        let mut history = MemHistory::new();

        record_history(&mut history, "Qual é o prazo?");
        record_history(&mut history, "   ");
        record_history(&mut history, "");
        record_history(&mut history, "E a garantia?");

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn exit_commands_ignore_case_only() {
        assert!(is_exit_command("SAIR"));
        assert!(is_exit_command("Quit"));
        assert!(!is_exit_command("sair agora"));
    }
}
