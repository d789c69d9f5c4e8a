#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(test)]
extern crate std;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use huati_protocol::{GrammarNode, TextTriple};

/// Text a node shows on its own, without looking at descendants.
///
/// Authored text wins. A ghost without authored text shows its implied
/// pronoun in brackets, with no romanization or gloss.
pub fn surface_text(node: &GrammarNode) -> Option<Cow<'_, TextTriple>> {
    if let Some(text) = &node.text {
        return Some(Cow::Borrowed(text));
    }
    if node.is_dropped {
        let hanzi = node.bracketed_implied_text()?;
        return Some(Cow::Owned(TextTriple {
            hanzi,
            pinyin: String::new(),
            translation: String::new(),
        }));
    }
    None
}

/// Synthesizes display text for a collapsed node from its subtree.
///
/// A node with its own surface text returns it verbatim. Otherwise walks
/// the descendants preorder in reading order: the first node on each path
/// that has surface text contributes it and its own descendants are
/// skipped; nodes without text are passed through. Ghost descendants are
/// included regardless of ghost visibility. Returns `None` when nothing
/// contributes.
pub fn aggregate_text(node: &GrammarNode) -> Option<TextTriple> {
    if let Some(text) = surface_text(node) {
        return Some(text.into_owned());
    }

    let mut joiner = TextJoiner::default();
    let mut stack: Vec<&GrammarNode> = node.children.iter().rev().collect();

    while let Some(current) = stack.pop() {
        match surface_text(current) {
            Some(text) => joiner.push(&text),
            None => stack.extend(current.children.iter().rev()),
        }
    }

    joiner.finish()
}

/// Accumulates text triples in reading order.
#[derive(Debug, Default)]
struct TextJoiner {
    hanzi: String,
    pinyin: Vec<String>,
    translation: Vec<String>,
    contributed: bool,
}

impl TextJoiner {
    fn push(&mut self, text: &TextTriple) {
        self.contributed = true;
        self.hanzi.push_str(&text.hanzi);
        push_token(&mut self.pinyin, &text.pinyin);
        push_token(&mut self.translation, &text.translation);
    }

    fn finish(self) -> Option<TextTriple> {
        if !self.contributed {
            return None;
        }
        Some(TextTriple {
            hanzi: self.hanzi,
            pinyin: self.pinyin.join(" "),
            translation: self.translation.join(" "),
        })
    }
}

// Empty tokens are dropped so joins never produce doubled or edge spaces.
fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(String::from(trimmed));
    }
}
