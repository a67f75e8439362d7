//! One-line summaries of debugged values

use regex_utils::summary_template::{self, Segment};

use super::{DebugValue, InspectError, SyntheticProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// A summary string such as `\{ w=${var.width}, h=${var.height} \}`
    Template(String),
    /// `items=<n>` for reference-counted vectors, not counting the
    /// metadata children
    VectorItems,
}

impl Summary {
    pub fn template(template: impl Into<String>) -> Self {
        Summary::Template(template.into())
    }

    pub fn render(
        &self,
        value: &dyn DebugValue,
        synthetic: Option<&dyn SyntheticProvider>,
    ) -> Result<String, InspectError> {
        match self {
            Summary::Template(template) => render_template(template, value, synthetic),
            Summary::VectorItems => {
                let children = synthetic.ok_or(InspectError::NoSyntheticProvider)?.num_children();
                Ok(format!("items={}", children.saturating_sub(2)))
            }
        }
    }
}

fn render_template(
    template: &str,
    value: &dyn DebugValue,
    synthetic: Option<&dyn SyntheticProvider>,
) -> Result<String, InspectError> {
    let mut out = String::new();

    for segment in summary_template::parse(template) {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Var { format: Some('#'), .. } | Segment::Synthetic { format: Some('#'), .. } => {
                let provider = synthetic.ok_or(InspectError::NoSyntheticProvider)?;
                out.push_str(&provider.num_children().to_string());
            }
            Segment::Var { path, format: Some('s') } => {
                let path: Vec<&str> = path.iter().map(String::as_str).collect();
                out.push_str(&value.member_string(&path)?);
            }
            Segment::Var { path, .. } | Segment::Synthetic { path, .. } => {
                let path: Vec<&str> = path.iter().map(String::as_str).collect();
                out.push_str(&value.member_unsigned(&path)?.to_string());
            }
        }
    }

    Ok(out)
}
