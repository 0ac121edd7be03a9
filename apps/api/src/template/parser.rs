//! Template parsing: source text → node tree.
//!
//! Recognised tags:
//! - `{{path}}` scalar placeholder (`name`, `contact.email`)
//! - `{{#if path}}` ... `{{/if}}` conditional block
//! - `<!-- START_SECTION:name -->` ... `<!-- END_SECTION:name -->` removable section
//! - `<!-- EXPERIENCE_ITEMS_PLACEHOLDER -->` and friends, item insertion points
//!
//! Anything else is literal text, except a stray `{{`, which is rejected so
//! that no placeholder syntax can survive into rendered output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::template::data::DataPath;
use crate::template::items::Collection;
use crate::template::{Node, TemplateError};

static RE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \{\{\s*(?:
            \#if\s+(?P<if>[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*)
          | (?P<endif>/if)
          | (?P<var>[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*)
        )\s*\}\}
        | <!--\s*(?P<marker>START_SECTION|END_SECTION):(?P<section>[A-Za-z0-9_-]+)\s*-->
        | <!--\s*(?P<insert>EXPERIENCE_ITEMS_PLACEHOLDER|EDUCATION_ITEMS_PLACEHOLDER|PROJECTS_ITEMS_PLACEHOLDER|SKILLS_CATEGORIES_PLACEHOLDER)\s*-->
        ",
    )
    .unwrap()
});

/// An open block waiting for its closing tag.
enum OpenBlock {
    If(DataPath),
    Section(String),
}

struct Frame {
    block: OpenBlock,
    offset: usize,
    nodes: Vec<Node>,
}

pub fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut cursor = 0;

    for caps in RE_TAG.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(tag) = classify(&caps) else { continue };
        push_text(current(&mut root, &mut stack), &source[cursor..whole.start()], cursor)?;
        cursor = whole.end();

        let offset = whole.start();
        match tag {
            Tag::Var(path) => current(&mut root, &mut stack).push(Node::Placeholder(path)),
            Tag::Insert(collection) => {
                current(&mut root, &mut stack).push(Node::Insertion(collection))
            }
            Tag::OpenIf(path) => stack.push(Frame {
                block: OpenBlock::If(path),
                offset,
                nodes: Vec::new(),
            }),
            Tag::OpenSection(name) => stack.push(Frame {
                block: OpenBlock::Section(name),
                offset,
                nodes: Vec::new(),
            }),
            Tag::CloseIf => match stack.pop() {
                Some(Frame {
                    block: OpenBlock::If(path),
                    nodes,
                    ..
                }) => current(&mut root, &mut stack).push(Node::Conditional { path, body: nodes }),
                Some(Frame {
                    block: OpenBlock::Section(name),
                    offset: opened,
                    ..
                }) => {
                    return Err(TemplateError::Unclosed {
                        tag: format!("START_SECTION:{name}"),
                        offset: opened,
                    })
                }
                None => return Err(TemplateError::UnexpectedEndIf { offset }),
            },
            Tag::CloseSection(found) => match stack.pop() {
                Some(Frame {
                    block: OpenBlock::Section(name),
                    nodes,
                    ..
                }) if name == found => {
                    current(&mut root, &mut stack).push(Node::Section { name, body: nodes })
                }
                Some(Frame {
                    block: OpenBlock::Section(expected),
                    ..
                }) => {
                    return Err(TemplateError::MismatchedEndSection {
                        expected,
                        found,
                        offset,
                    })
                }
                Some(Frame {
                    block: OpenBlock::If(path),
                    offset: opened,
                    ..
                }) => {
                    return Err(TemplateError::Unclosed {
                        tag: format!("#if {path}"),
                        offset: opened,
                    })
                }
                None => return Err(TemplateError::UnexpectedEndSection { name: found, offset }),
            },
        }
    }

    if let Some(frame) = stack.pop() {
        let tag = match frame.block {
            OpenBlock::If(path) => format!("#if {path}"),
            OpenBlock::Section(name) => format!("START_SECTION:{name}"),
        };
        return Err(TemplateError::Unclosed {
            tag,
            offset: frame.offset,
        });
    }

    push_text(&mut root, &source[cursor..], cursor)?;
    Ok(root)
}

enum Tag {
    Var(DataPath),
    OpenIf(DataPath),
    CloseIf,
    OpenSection(String),
    CloseSection(String),
    Insert(Collection),
}

fn classify(caps: &Captures<'_>) -> Option<Tag> {
    if let Some(path) = caps.name("if") {
        return Some(Tag::OpenIf(DataPath::parse(path.as_str())));
    }
    if caps.name("endif").is_some() {
        return Some(Tag::CloseIf);
    }
    if let Some(path) = caps.name("var") {
        return Some(Tag::Var(DataPath::parse(path.as_str())));
    }
    if let (Some(marker), Some(section)) = (caps.name("marker"), caps.name("section")) {
        let name = section.as_str().to_string();
        return Some(match marker.as_str() {
            "START_SECTION" => Tag::OpenSection(name),
            _ => Tag::CloseSection(name),
        });
    }
    caps.name("insert")
        .and_then(|m| Collection::from_insertion_marker(m.as_str()))
        .map(Tag::Insert)
}

fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [Frame]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.nodes,
        None => root,
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str, base: usize) -> Result<(), TemplateError> {
    if let Some(pos) = text.find("{{") {
        return Err(TemplateError::StrayTag { offset: base + pos });
    }
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parse("<p>hi</p>").unwrap(), vec![Node::Text("<p>hi</p>".into())]);
    }

    #[test]
    fn test_parse_placeholders_with_whitespace() {
        let nodes = parse("{{ name }}-{{contact.email}}").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Placeholder(DataPath::parse("name")),
                Node::Text("-".into()),
                Node::Placeholder(DataPath::parse("contact.email")),
            ]
        );
    }

    #[test]
    fn test_parse_nested_blocks() {
        let src = "<!-- START_SECTION:profile -->{{#if a}}x{{#if b.c}}y{{/if}}{{/if}}<!-- END_SECTION:profile -->";
        let nodes = parse(src).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Section {
                name: "profile".into(),
                body: vec![Node::Conditional {
                    path: DataPath::parse("a"),
                    body: vec![
                        Node::Text("x".into()),
                        Node::Conditional {
                            path: DataPath::parse("b.c"),
                            body: vec![Node::Text("y".into())],
                        },
                    ],
                }],
            }]
        );
    }

    #[test]
    fn test_parse_insertion_points() {
        let nodes = parse("<!-- SKILLS_CATEGORIES_PLACEHOLDER --><!--EXPERIENCE_ITEMS_PLACEHOLDER-->").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Insertion(Collection::Skills),
                Node::Insertion(Collection::Experience),
            ]
        );
    }

    #[test]
    fn test_unknown_comment_is_literal() {
        let nodes = parse("<!-- OTHER_PLACEHOLDER -->").unwrap();
        assert_eq!(nodes, vec![Node::Text("<!-- OTHER_PLACEHOLDER -->".into())]);
    }

    #[test]
    fn test_stray_braces_rejected() {
        assert_eq!(parse("ab{{ not valid"), Err(TemplateError::StrayTag { offset: 2 }));
        assert!(matches!(parse("{{a..b}}"), Err(TemplateError::StrayTag { .. })));
    }

    #[test]
    fn test_unexpected_end_if() {
        assert_eq!(parse("x{{/if}}"), Err(TemplateError::UnexpectedEndIf { offset: 1 }));
    }

    #[test]
    fn test_unclosed_if() {
        assert_eq!(
            parse("{{#if name}}x"),
            Err(TemplateError::Unclosed {
                tag: "#if name".into(),
                offset: 0
            })
        );
    }

    #[test]
    fn test_mismatched_end_section() {
        let src = "<!-- START_SECTION:skills -->x<!-- END_SECTION:projects -->";
        assert!(matches!(
            parse(src),
            Err(TemplateError::MismatchedEndSection { expected, found, .. })
                if expected == "skills" && found == "projects"
        ));
    }

    #[test]
    fn test_end_section_without_start() {
        assert!(matches!(
            parse("<!-- END_SECTION:skills -->"),
            Err(TemplateError::UnexpectedEndSection { .. })
        ));
    }

    #[test]
    fn test_interleaved_blocks_rejected() {
        let src = "<!-- START_SECTION:skills -->{{#if a}}<!-- END_SECTION:skills -->{{/if}}";
        assert!(matches!(parse(src), Err(TemplateError::Unclosed { .. })));
    }
}
