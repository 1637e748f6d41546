use std::path::PathBuf;

use clap::Parser;
use srtree::{
    domain::{TreeNode, Value},
    Config, DocumentTree,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the content tree of a structured report document")]
pub struct Show {
    /// The dataset file holding the document
    path: PathBuf,

    /// Only show content items down to this depth
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,

    /// Show the position string of each content item
    #[arg(long)]
    positions: bool,

    /// Show annotation texts
    #[arg(long)]
    annotations: bool,
}

impl Show {
    #[instrument(level = "debug", skip(self, config), fields(path = %self.path.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::load_document(&self.path, config)?;
        let common = document.common();
        let general = document.general();

        println!("{}", document.document_type().to_string().info());
        println!(
            "{}",
            format!(
                "patient {} | completion {} | verification {} | content {} {}",
                common.patient().patient_name(),
                general.completion_flag(),
                general.verification_flag(),
                general.content_date(),
                general.content_time()
            )
            .dim()
        );
        println!();

        let tree = document.tree();
        for &id in tree.top_level() {
            if let Some(node) = tree.node(id) {
                self.print_node(tree, node, 0);
            }
        }
        Ok(())
    }

    fn print_node(&self, tree: &DocumentTree, node: &TreeNode, depth: usize) {
        if self.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let content = node.content();
        let indent = "  ".repeat(depth);
        let mut line = indent.clone();
        if self.positions {
            if let Some(position) = tree.position_of(node.id()) {
                line.push_str(&format!("{} ", position.dim()));
            }
        }
        line.push_str(&format!(
            "<{}> {}",
            node.relationship(),
            content.value_type().to_string().info()
        ));
        if let Some(name) = content.concept_name() {
            line.push_str(&format!(" {}", name.code_meaning().success()));
        }
        let value = describe(content.value());
        if !value.is_empty() {
            line.push_str(&format!(" = {value}"));
        }
        println!("{line}");
        if self.annotations {
            if let Some(annotation) = content.annotation() {
                println!("{indent}  {}", format!("# {annotation}").dim());
            }
        }

        for &child in node.children() {
            if let Some(child) = tree.node(child) {
                self.print_node(tree, child, depth + 1);
            }
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Container(continuity) => continuity.defined_term().to_string(),
        Value::Code(Some(code)) => code.to_string(),
        Value::Code(None) => "(no code)".warning(),
        Value::Num(measurement) => {
            let mut text = measurement.value.clone();
            if !measurement.unit.is_empty() {
                text.push_str(&format!(" [{}]", measurement.unit.code_value()));
            }
            text
        }
        Value::Image(image) => format!("image {}", image.sop.sop_instance_uid),
        Value::Waveform(waveform) => format!("waveform {}", waveform.sop.sop_instance_uid),
        Value::Composite(sop) => format!("object {}", sop.sop_instance_uid),
        Value::Reference(target) => format!("-> {}", target.position),
        Value::Unknown(term) => format!("unsupported value type {term}").warning(),
        other => other
            .as_str()
            .map(|text| format!("\"{text}\""))
            .unwrap_or_default(),
    }
}
