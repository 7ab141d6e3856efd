//! Property tests for recursive character splitting.

use pdfchat_rag::{Document, RecursiveCharacterSplitter, TextSplitter};
use proptest::prelude::*;
use serde_json::json;

/// Single-line text of unique words: `x..x<index>` joined by single spaces.
fn arb_unique_words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(1usize..12, 1..300).prop_map(|lengths| {
        lengths
            .into_iter()
            .enumerate()
            .map(|(index, len)| format!("{}{index}", "x".repeat(len)))
            .collect()
    })
}

fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (20usize..200).prop_flat_map(|size| (Just(size), 0..size / 2))
}

/// **Chunk bounds**
/// *For any* text of words shorter than the chunk size, every chunk SHALL be
/// non-empty, at most `chunk_size` characters, and a substring of the input.
mod prop_chunk_bounds {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_are_bounded_and_drawn_from_the_text(
            words in arb_unique_words(),
            (size, overlap) in arb_sizes(),
        ) {
            let text = words.join(" ");
            let chunks = RecursiveCharacterSplitter::new(size, overlap).split_text(&text);

            prop_assert!(!chunks.is_empty());
            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.chars().count() <= size);
                prop_assert!(text.contains(chunk.as_str()));
            }
        }
    }
}

/// **Coverage and overlap**
/// *For any* single-line text of unique words, every word SHALL appear in some
/// chunk, and the words shared by consecutive chunks SHALL be a suffix of the
/// first and a prefix of the second whose joined length is at most
/// `chunk_overlap`.
mod prop_chunk_overlap {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn consecutive_chunks_share_a_bounded_boundary(
            words in arb_unique_words(),
            (size, overlap) in arb_sizes(),
        ) {
            let text = words.join(" ");
            let chunks = RecursiveCharacterSplitter::new(size, overlap).split_text(&text);
            let chunk_words: Vec<Vec<&str>> =
                chunks.iter().map(|chunk| chunk.split(' ').collect()).collect();

            for word in &words {
                prop_assert!(chunk_words.iter().any(|ws| ws.contains(&word.as_str())));
            }

            for pair in chunk_words.windows(2) {
                let (previous, next) = (&pair[0], &pair[1]);
                let shared: Vec<&str> =
                    next.iter().copied().filter(|word| previous.contains(word)).collect();

                prop_assert!(previous.ends_with(&shared));
                prop_assert!(next.starts_with(&shared));
                prop_assert!(shared.join(" ").chars().count() <= overlap);
            }
        }
    }
}

#[test]
fn default_splitter_uses_thousand_characters_with_overlap() {
    let splitter = RecursiveCharacterSplitter::default();
    assert_eq!(splitter.chunk_size(), 1000);
    assert_eq!(splitter.chunk_overlap(), 150);
}

#[test]
fn paragraphs_are_preferred_over_lines() {
    let first = "a".repeat(600);
    let second = "b".repeat(600);
    let text = format!("{first}\n\n{second}");

    let chunks = RecursiveCharacterSplitter::default().split_text(&text);

    assert_eq!(chunks, vec![first, second]);
}

#[test]
fn unbroken_text_is_split_into_characters() {
    let text = "z".repeat(2500);
    let chunks = RecursiveCharacterSplitter::default().split_text(&text);

    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 1000));
    assert_eq!(chunks[0].len(), 1000);
    assert_eq!(chunks[1].len(), 1000);
}

#[test]
fn chunk_documents_inherit_page_metadata() {
    let metadata = json!({ "page": 3, "source": "manual.pdf" });
    let page = Document::new("um dois tres quatro cinco seis sete oito nove dez")
        .with_metadata(metadata.as_object().unwrap().clone());

    let chunks = RecursiveCharacterSplitter::new(20, 5).split_documents(&[page]);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.metadata["page"], 3);
        assert!(chunk.id.is_none());
    }
}
