//! Grounded prompt assembly and the generative model boundary.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;

/// The exact sentence the model must answer with when the context does not
/// contain the answer.
pub const REFUSAL: &str = "Não tenho informações necessárias para responder sua pergunta.";

/// A generative model that turns a fully rendered prompt into a text answer.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The model name, for logs and errors.
    fn name(&self) -> &str;
}

/// Join retrieved chunk texts with a blank line, keeping retrieval order.
pub fn build_context(results: &[SearchResult]) -> String {
    results.iter().map(|result| result.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Fill the answering template with the retrieved context and the user's
/// question.
///
/// The template restricts the model to the context, demands [`REFUSAL`] when
/// the answer is not explicitly present, and anchors that behaviour with three
/// out-of-context examples.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        r#"
CONTEXTO:
{context}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "{REFUSAL}"
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "{REFUSAL}"

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "{REFUSAL}"

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "{REFUSAL}"

PERGUNTA DO USUÁRIO:
{question}

RESPONDA A "PERGUNTA DO USUÁRIO"
"#
    )
}
