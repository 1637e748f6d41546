//! Human-readable HTML rendering of a content tree.
//!
//! `CONTAINS` children are rendered in the document body. Children with any
//! other relationship (observation context, concept modifiers, properties,
//! inferred from, ...) become numbered annex entries that the body links to.

use std::borrow::Cow;

use quick_xml::escape::escape;

use crate::domain::{
    CodedEntry, ContinuityOfContent, DocumentSubTree, DocumentType, RelationshipType,
    RenderOptions, TreeNode, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Main,
    Annex,
}

struct Renderer<'a> {
    tree: &'a DocumentSubTree,
    options: &'a RenderOptions,
    main: String,
    annex: String,
    annex_number: usize,
}

fn anchor(position: &str) -> String {
    format!("item_{}", position.replace('.', "_"))
}

fn person_name(name: &str) -> String {
    // family^given^middle^prefix^suffix
    let parts: Vec<&str> = name.split('^').collect();
    let pick = |index: usize| parts.get(index).copied().unwrap_or_default().trim();
    [pick(3), pick(1), pick(2), pick(0), pick(4)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Renderer<'_> {
    const fn out(&mut self, stream: Stream) -> &mut String {
        match stream {
            Stream::Main => &mut self.main,
            Stream::Annex => &mut self.annex,
        }
    }

    fn code(&self, code: &CodedEntry) -> String {
        let meaning = escape(code.code_meaning());
        if self.options.render_code_values {
            format!(
                "{meaning} <small>({}, {})</small>",
                escape(code.code_value()),
                escape(code.coding_scheme())
            )
        } else {
            meaning.into_owned()
        }
    }

    fn value(&self, value: &Value) -> Cow<'static, str> {
        match value {
            Value::Container(_) => Cow::Borrowed(""),
            Value::Text(text) => escape(text).replace('\n', "<br>").into(),
            Value::Code(Some(code)) => self.code(code).into(),
            Value::Code(None) => Cow::Borrowed("<i>(no code)</i>"),
            Value::Num(measurement) => {
                let mut text = escape(&measurement.value).into_owned();
                if !measurement.unit.is_empty() {
                    text.push(' ');
                    text.push_str(&escape(measurement.unit.code_value()));
                }
                if let Some(qualifier) = &measurement.qualifier {
                    text.push_str(&format!(" [{}]", self.code(qualifier)));
                }
                text.trim().to_string().into()
            }
            Value::PName(name) => escape(&person_name(name)).into_owned().into(),
            Value::Date(text) | Value::Time(text) | Value::DateTime(text) | Value::UidRef(text) => {
                escape(text).into_owned().into()
            }
            Value::Image(image) => {
                let mut text = format!("image {}", escape(&image.sop.sop_instance_uid));
                if !image.frames.is_empty() {
                    let frames: Vec<String> = image.frames.iter().map(u32::to_string).collect();
                    text.push_str(&format!(", frames {}", frames.join(", ")));
                }
                if !image.segments.is_empty() {
                    let segments: Vec<String> = image.segments.iter().map(u32::to_string).collect();
                    text.push_str(&format!(", segments {}", segments.join(", ")));
                }
                if let Some(state) = &image.presentation_state {
                    text.push_str(&format!(
                        ", presentation state {}",
                        escape(&state.sop_instance_uid)
                    ));
                }
                text.into()
            }
            Value::Waveform(waveform) => {
                let mut text = format!("waveform {}", escape(&waveform.sop.sop_instance_uid));
                if !waveform.channels.is_empty() {
                    let channels: Vec<String> = waveform
                        .channels
                        .chunks(2)
                        .map(|pair| pair.iter().map(u16::to_string).collect::<Vec<_>>().join("/"))
                        .collect();
                    text.push_str(&format!(", channels {}", channels.join(", ")));
                }
                text.into()
            }
            Value::Composite(sop) => format!("object {}", escape(&sop.sop_instance_uid)).into(),
            Value::Reference(target) => format!(
                "<a href=\"#{}\">content item {}</a>",
                anchor(&target.position),
                escape(&target.position)
            )
            .into(),
            Value::Unknown(term) => {
                format!("<i>unsupported value type {}</i>", escape(term)).into()
            }
        }
    }

    fn annotation(&mut self, node: &TreeNode, stream: Stream) {
        if !self.options.render_annotations {
            return;
        }
        if let Some(text) = node.content().annotation() {
            let text = text.replace("--", "- -");
            self.out(stream).push_str(&format!("<!-- {text} -->\n"));
        }
    }

    /// Renders the non-`CONTAINS` children of `node` into the annex and
    /// returns the links to them.
    fn annex_children(&mut self, node: &TreeNode, level: usize) -> String {
        let tree = self.tree;
        let mut links = Vec::new();
        for child in node.children().iter().filter_map(|&id| tree.node(id)) {
            if child.relationship() == RelationshipType::Contains {
                continue;
            }
            self.annex_number += 1;
            let number = self.annex_number;
            links.push(format!("<a href=\"#annex_{number}\">{number}</a>"));
            self.annex.push_str(&format!(
                "<div class=\"annex\" id=\"annex_{number}\">\n<p><b>[{number}]</b> <i>{}</i>",
                escape(&child.relationship().to_string())
            ));
            self.item(child, level + 1, Stream::Annex, true);
            self.annex.push_str("</div>\n");
        }
        if links.is_empty() {
            String::new()
        } else {
            format!("<sup>{}</sup>", links.join(", "))
        }
    }

    fn item(&mut self, node: &TreeNode, level: usize, stream: Stream, continued: bool) {
        let tree = self.tree;
        let content = node.content();
        let position = tree.position_of(node.id()).unwrap_or_default();
        self.annotation(node, stream);
        let id = if node.is_reference_target() {
            format!(" id=\"{}\"", anchor(&position))
        } else {
            String::new()
        };
        let name = content
            .concept_name()
            .map(|name| self.code(name))
            .unwrap_or_default();

        if let Value::Container(continuity) = content.value() {
            let heading = level.clamp(1, 6);
            let links = self.annex_children(node, level);
            let out = self.out(stream);
            if continued {
                out.push_str("</p>\n");
            }
            if !name.is_empty() || !id.is_empty() {
                out.push_str(&format!("<h{heading}{id}>{name}{links}</h{heading}>\n"));
            }
            let children: Vec<&TreeNode> = node
                .children()
                .iter()
                .filter_map(|&child| tree.node(child))
                .filter(|child| child.relationship() == RelationshipType::Contains)
                .collect();
            if *continuity == ContinuityOfContent::Continuous {
                let text: Vec<String> = children
                    .iter()
                    .map(|child| self.value(child.content().value()).into_owned())
                    .collect();
                self.out(stream)
                    .push_str(&format!("<p>{}</p>\n", text.join(" ")));
            } else {
                for child in children {
                    self.item(child, level + 1, stream, false);
                }
            }
            return;
        }

        let value = self.value(content.value());
        let links = self.annex_children(node, level);
        let out = self.out(stream);
        let label = if name.is_empty() {
            String::new()
        } else {
            format!("<b>{name}:</b> ")
        };
        if continued {
            out.push_str(&format!(" <span{id}>{label}{value}</span>{links}</p>\n"));
        } else {
            out.push_str(&format!("<p{id}>{label}{value}{links}</p>\n"));
        }
        let children: Vec<&TreeNode> = node
            .children()
            .iter()
            .filter_map(|&child| tree.node(child))
            .filter(|child| child.relationship() == RelationshipType::Contains)
            .collect();
        for child in children {
            self.item(child, level + 1, stream, false);
        }
    }
}

/// Renders `tree` as a complete HTML document.
pub(crate) fn render(
    tree: &DocumentSubTree,
    document_type: DocumentType,
    options: &RenderOptions,
) -> String {
    let mut renderer = Renderer {
        tree,
        options,
        main: String::new(),
        annex: String::new(),
        annex_number: 0,
    };
    for node in tree.top_level().iter().filter_map(|&id| tree.node(id)) {
        renderer.item(node, 1, Stream::Main, false);
    }

    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(document_type.name())));
    if let Some(stylesheet) = &options.stylesheet {
        html.push_str(&format!(
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n",
            escape(stylesheet)
        ));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(&renderer.main);
    if !renderer.annex.is_empty() {
        html.push_str("<hr>\n<h2>Annex</h2>\n");
        html.push_str(&renderer.annex);
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddMode, NumericMeasurement, ValueType};

    fn name(value: &str, meaning: &str) -> Option<CodedEntry> {
        Some(CodedEntry::new(value, "99TEST", meaning))
    }

    fn sample() -> DocumentSubTree {
        let mut tree = DocumentSubTree::new();
        tree.add_content_item(
            RelationshipType::IsRoot,
            ValueType::Container,
            name("r", "Report"),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Num,
            name("d", "Diameter"),
            AddMode::BelowCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_numeric_value(
                NumericMeasurement::new("12", CodedEntry::new("mm", "UCUM", "millimeter")),
                true,
            )
            .unwrap();
        tree.add_content_item(
            RelationshipType::HasConceptMod,
            ValueType::Code,
            name("m", "Method"),
            AddMode::BelowCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_code_value(CodedEntry::new("c", "99TEST", "Caliper <manual>"), true)
            .unwrap();
        tree
    }

    #[test]
    fn renders_body_and_annex() {
        let html = render(&sample(), DocumentType::ComprehensiveSR, &RenderOptions::default());
        assert!(html.contains("<title>Comprehensive SR</title>"), "{html}");
        assert!(html.contains("<h1>Report</h1>"), "{html}");
        assert!(
            html.contains("<b>Diameter:</b> 12 mm<sup><a href=\"#annex_1\">1</a></sup>"),
            "{html}"
        );
        assert!(html.contains("id=\"annex_1\""), "{html}");
        assert!(html.contains("Caliper &lt;manual&gt;"), "{html}");
    }

    #[test]
    fn code_values_and_stylesheet_on_request() {
        let options = RenderOptions {
            render_code_values: true,
            stylesheet: Some("report.css".to_string()),
            ..RenderOptions::default()
        };
        let html = render(&sample(), DocumentType::ComprehensiveSR, &options);
        assert!(html.contains("href=\"report.css\""), "{html}");
        assert!(html.contains("<small>(c, 99TEST)</small>"), "{html}");
    }

    #[test]
    fn person_names_are_reordered() {
        assert_eq!(person_name("Doe^Jane^^Dr."), "Dr. Jane Doe");
        assert_eq!(person_name("Doe"), "Doe");
    }
}
