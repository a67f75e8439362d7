//! Formatter category binding type names to providers and summaries

use regex_utils::type_pattern::TypePattern;
use tracing::debug;

use super::layout::CowDataLayout;
use super::providers::{CountedArrayProvider, VectorProvider};
use super::summary::Summary;
use super::SyntheticProvider;

/// Category the engine's formatters are registered under
pub const CATEGORY_NAME: &str = "Godot";

/// Which synthetic provider a type is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorKind {
    Vector,
    LocalVector,
    VectorView,
}

impl InspectorKind {
    pub fn provider(&self) -> Box<dyn SyntheticProvider> {
        match self {
            InspectorKind::Vector => Box::new(VectorProvider::new(CowDataLayout::V1)),
            InspectorKind::LocalVector => Box::new(CountedArrayProvider::local_vector()),
            InspectorKind::VectorView => Box::new(CountedArrayProvider::vector_view()),
        }
    }
}

#[derive(Debug, Clone)]
enum TypeMatcher {
    Exact(String),
    Pattern(TypePattern),
}

impl TypeMatcher {
    fn matches(&self, type_name: &str) -> bool {
        match self {
            TypeMatcher::Exact(name) => name == type_name,
            TypeMatcher::Pattern(pattern) => pattern.matches(type_name),
        }
    }
}

/// Named group of formatter bindings that is enabled or disabled as a whole
#[derive(Debug, Clone)]
pub struct FormatterCategory {
    name: String,
    enabled: bool,
    synthetics: Vec<(TypeMatcher, InspectorKind)>,
    summaries: Vec<(TypeMatcher, Summary)>,
}

impl FormatterCategory {
    /// An empty, disabled category
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), enabled: false, synthetics: Vec::new(), summaries: Vec::new() }
    }

    /// The engine's bindings, enabled
    pub fn godot() -> Result<Self, regex::Error> {
        let mut category = Self::new(CATEGORY_NAME);

        category.add_synthetic("LocalVector<", InspectorKind::LocalVector)?;
        category.add_synthetic("VectorView<", InspectorKind::VectorView)?;
        category.add_synthetic("Vector<.+>$", InspectorKind::Vector)?;

        let string = Summary::template("${var._cowdata._ptr%s}");
        category.add_summary("String", string.clone());
        category.add_summary("CharString", string);
        category.add_summary("Vector2i", Summary::template(r"\{ w=${var.width}, h=${var.height} \}"));
        category.add_summary(
            "Rect2i",
            Summary::template(
                r"\{ x=${var.position.x}, y=${var.position.height}, w=${var.size.width}, h=${var.size.height} \}",
            ),
        );
        for pattern in ["VectorView<", "LocalVector<", "TightLocalVector<"] {
            category.add_summary_pattern(pattern, Summary::template("${svar%#} items"))?;
        }
        category.add_summary_pattern("Vector<.+>$", Summary::VectorItems)?;

        category.enable();
        Ok(category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        debug!("Enabling formatter category {}", self.name);
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        debug!("Disabling formatter category {}", self.name);
        self.enabled = false;
    }

    /// Bind types matching `pattern` to a synthetic provider
    pub fn add_synthetic(&mut self, pattern: &str, kind: InspectorKind) -> Result<(), regex::Error> {
        self.synthetics.push((TypeMatcher::Pattern(TypePattern::new(pattern)?), kind));
        Ok(())
    }

    /// Bind the type called exactly `type_name` to a summary
    pub fn add_summary(&mut self, type_name: &str, summary: Summary) {
        self.summaries.push((TypeMatcher::Exact(type_name.to_string()), summary));
    }

    /// Bind types matching `pattern` to a summary
    pub fn add_summary_pattern(&mut self, pattern: &str, summary: Summary) -> Result<(), regex::Error> {
        self.summaries.push((TypeMatcher::Pattern(TypePattern::new(pattern)?), summary));
        Ok(())
    }

    pub fn synthetic_for(&self, type_name: &str) -> Option<InspectorKind> {
        if !self.enabled {
            return None;
        }
        self.synthetics.iter().find(|(m, _)| m.matches(type_name)).map(|(_, kind)| *kind)
    }

    pub fn summary_for(&self, type_name: &str) -> Option<&Summary> {
        if !self.enabled {
            return None;
        }
        self.summaries.iter().find(|(m, _)| m.matches(type_name)).map(|(_, summary)| summary)
    }

    /// A fresh provider for `type_name`, if one is bound
    pub fn provider_for(&self, type_name: &str) -> Option<Box<dyn SyntheticProvider>> {
        self.synthetic_for(type_name).map(|kind| kind.provider())
    }
}
