//! Chat loop tests with a scripted reader and a stub answerer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pdfchat_cli::{Answerer, LineReader, run_chat};
use pdfchat_rag::RagError;

struct ScriptedReader {
    lines: VecDeque<String>,
    prompts: usize,
}

impl ScriptedReader {
    fn new(lines: &[&str]) -> Self {
        Self { lines: lines.iter().map(|line| line.to_string()).collect(), prompts: 0 }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        assert_eq!(prompt, "Você: ");
        self.prompts += 1;
        Ok(self.lines.pop_front())
    }
}

/// Echoes questions back; questions containing `falha` fail.
#[derive(Default)]
struct EchoAnswerer {
    questions: Mutex<Vec<String>>,
}

impl EchoAnswerer {
    fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Answerer for EchoAnswerer {
    async fn answer(&self, question: &str) -> pdfchat_rag::Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        if question.contains("falha") {
            return Err(RagError::GenerationError {
                model: "echo".to_string(),
                message: "serviço indisponível".to_string(),
            });
        }
        Ok(format!("eco: {question}"))
    }
}

async fn run(lines: &[&str]) -> (EchoAnswerer, ScriptedReader, String) {
    let answerer = EchoAnswerer::default();
    let mut reader = ScriptedReader::new(lines);
    let mut out = Vec::new();
    run_chat(&answerer, &mut reader, &mut out).await.unwrap();
    (answerer, reader, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn prints_banner_and_goodbye() {
    let (_, _, out) = run(&["sair"]).await;

    let rule = "=".repeat(50);
    assert!(out.starts_with(&format!("{rule}\nChat com Documentos PDF - Sistema RAG\n{rule}\n")));
    assert!(out.contains("'sair', 'exit' ou 'quit'"));
    assert!(out.ends_with("Encerrando o assistente. Até logo!\n"));
}

#[tokio::test]
async fn exit_commands_match_in_any_case() {
    for command in ["sair", "Exit", "QUIT", "  sair  "] {
        let (answerer, reader, _) = run(&[command, "nunca lida"]).await;

        assert!(answerer.questions().is_empty(), "{command:?} should end the chat");
        assert_eq!(reader.lines.len(), 1);
    }
}

#[tokio::test]
async fn each_question_is_answered_exactly_once() {
    let (answerer, _, out) = run(&["  Qual é o prazo?  ", "E a garantia?", "exit"]).await;

    assert_eq!(answerer.questions(), vec!["Qual é o prazo?", "E a garantia?"]);
    assert_eq!(out.matches("Buscando informações...").count(), 2);
    assert!(out.contains("Assistente: eco: Qual é o prazo?\n"));
    assert!(out.contains(&format!("{}\n", "-".repeat(50))));
}

#[tokio::test]
async fn errors_are_reported_and_the_loop_continues() {
    let (answerer, _, out) = run(&["isso falha", "e isso funciona", "quit"]).await;

    assert_eq!(answerer.questions().len(), 2);
    assert!(out.contains("Erro ao processar pergunta: "));
    assert!(out.contains("serviço indisponível"));
    assert!(out.contains("Tente novamente."));
    assert!(out.contains("Assistente: eco: e isso funciona"));
}

#[tokio::test]
async fn end_of_input_exits_cleanly() {
    let (answerer, reader, out) = run(&["uma pergunta"]).await;

    assert_eq!(answerer.questions().len(), 1);
    assert_eq!(reader.prompts, 2);
    assert!(out.ends_with("Encerrando o assistente. Até logo!\n"));
}
