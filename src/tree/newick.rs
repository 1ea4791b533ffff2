//! Reader for the tree files produced upstream.
//!
//! Files are either plain Newick or NEXUS. For NEXUS the `Dimensions
//! NTax=` line gives the declared tip count and the `tree <name> = ...`
//! statement holds the Newick string.

use super::phylo::{NodeId, PhyloTree};
use crate::error::{ReportError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct TreeFile {
    pub tree: PhyloTree,
    /// Tip count declared by the file, or the leaf count when undeclared.
    pub declared_tips: usize,
}

pub fn read_tree_file(path: &Path) -> Result<TreeFile> {
    let text = fs::read_to_string(path)?;
    parse_tree_text(&text).map_err(|message| ReportError::TreeParse {
        path: path.to_path_buf(),
        message,
    })
}

pub(crate) fn parse_tree_text(text: &str) -> std::result::Result<TreeFile, String> {
    if text.trim_start().to_ascii_uppercase().starts_with("#NEXUS") {
        let declared = ntax_regex()
            .captures(text)
            .and_then(|c| c[1].parse::<usize>().ok());
        let newick = tree_statement_regex()
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| &text[m.start()..])
            .ok_or_else(|| "NEXUS file has no tree statement".to_string())?;
        let tree = parse_newick(newick)?;
        let declared_tips = declared.unwrap_or_else(|| tree.leaves().len());
        Ok(TreeFile {
            tree,
            declared_tips,
        })
    } else {
        let tree = parse_newick(text)?;
        let declared_tips = tree.leaves().len();
        Ok(TreeFile {
            tree,
            declared_tips,
        })
    }
}

fn ntax_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)dimensions\s+ntax\s*=\s*(\d+)").expect("valid regex"))
}

fn tree_statement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\s*tree\s+[^=\s]+\s*=\s*(.*)$").expect("valid regex"))
}

/// Parse one Newick tree. Square-bracket comments (`[&R]`, annotations)
/// are skipped and quoted labels may contain any character.
///
/// The parser recurses once per nesting level, so very deep ladder-shaped
/// trees need the main thread's stack; a few thousand levels overflow a
/// 2 MB worker thread stack.
pub fn parse_newick(text: &str) -> std::result::Result<PhyloTree, String> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.skip_trivia();
    if parser.at_end() {
        return Err("empty tree".to_string());
    }
    let mut tree = PhyloTree::with_root();
    let root = tree.root();
    parser.subtree(&mut tree, root)?;
    parser.skip_trivia();
    match parser.peek() {
        Some(';') | None => Ok(tree),
        Some(c) => Err(format!("unexpected `{}` at position {}", c, parser.pos)),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '[' {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == ']' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn subtree(&mut self, tree: &mut PhyloTree, id: NodeId) -> std::result::Result<(), String> {
        self.skip_trivia();
        if self.peek() == Some('(') {
            self.pos += 1;
            loop {
                let child = tree.add_child(id);
                self.subtree(tree, child)?;
                self.skip_trivia();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some(')') => {
                        self.pos += 1;
                        break;
                    }
                    Some(c) => {
                        return Err(format!("unexpected `{}` at position {}", c, self.pos))
                    }
                    None => return Err("unbalanced parentheses".to_string()),
                }
            }
        }

        self.skip_trivia();
        let label = self.label()?;
        if !label.is_empty() {
            tree.node_mut(id).name = Some(label);
        }

        self.skip_trivia();
        if self.peek() == Some(':') {
            self.pos += 1;
            self.skip_trivia();
            let length = self.number()?;
            tree.node_mut(id).length = length;
        }
        Ok(())
    }

    fn label(&mut self) -> std::result::Result<String, String> {
        let mut label = String::new();
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                loop {
                    match self.peek() {
                        Some(c) if c == quote => {
                            self.pos += 1;
                            // A doubled quote is an escaped quote.
                            if self.peek() == Some(quote) {
                                label.push(quote);
                                self.pos += 1;
                            } else {
                                break;
                            }
                        }
                        Some(c) => {
                            label.push(c);
                            self.pos += 1;
                        }
                        None => return Err("unterminated quoted label".to_string()),
                    }
                }
            }
            _ => {
                while let Some(c) = self.peek() {
                    if matches!(c, '(' | ')' | ',' | ':' | ';' | '[') || c.is_whitespace() {
                        break;
                    }
                    label.push(c);
                    self.pos += 1;
                }
            }
        }
        Ok(label)
    }

    fn number(&mut self) -> std::result::Result<f64, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        raw.parse::<f64>()
            .map_err(|_| format!("invalid branch length `{}` at position {}", raw, start))
    }
}
