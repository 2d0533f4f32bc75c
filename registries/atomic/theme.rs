use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

pub const BASE_TYPE_ENTITY: &str = "entity";
pub const BASE_TYPE_RELATION: &str = "relation";
pub const BASE_TYPE_ATTRIBUTE: &str = "attribute";
pub const BASE_TYPE_ROLE: &str = "role";
pub const BASE_TYPE_RULE: &str = "rule";
pub const BASE_TYPE_SCHEMA: &str = "type";
const BASE_TYPE_FALLBACK: &str = "other";

/// Shapes understood by the engine's node renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    Box,
    Ellipse,
    Diamond,
    Dot,
    Hexagon,
    Triangle,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub border: String,
}

/// Node color bundle: resting, highlighted, and hovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeColor {
    pub background: String,
    pub border: String,
    pub highlight: ColorPair,
    pub hover: ColorPair,
}

impl NodeColor {
    /// Borderless bundle: borders repeat their background, hover repeats
    /// highlight.
    pub fn flat(background: &str, highlight: &str) -> Self {
        let highlight = ColorPair {
            background: highlight.to_string(),
            border: highlight.to_string(),
        };
        Self {
            background: background.to_string(),
            border: background.to_string(),
            hover: highlight.clone(),
            highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeColor {
    pub color: String,
    pub highlight: String,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

/// Presentation bundle stored with each node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePresentation {
    pub color: NodeColor,
    pub font: FontStyle,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePresentation {
    pub color: EdgeColor,
    pub font: FontStyle,
}

/// Source of node and edge presentation; opaque to the graph store.
pub trait StyleProvider {
    fn node_presentation(&self, node_type: &str, base_type: &str) -> NodePresentation;
    fn edge_presentation(&self) -> EdgePresentation;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseTypeStyle {
    pub background: String,
    pub highlight: String,
    pub font_color: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone)]
pub struct StyleResolution {
    pub requested_id: String,
    pub resolved_id: String,
    pub fallback_used: bool,
    pub style: BaseTypeStyle,
}

/// Base-type palette with optional per-type color overrides.
pub struct ThemeRegistry {
    base_types: HashMap<String, BaseTypeStyle>,
    type_colors: HashMap<String, (String, String)>,
    fallback_id: String,
    edge: EdgePresentation,
}

impl ThemeRegistry {
    pub fn register(&mut self, base_type: &str, style: BaseTypeStyle) {
        self.base_types.insert(base_type.to_ascii_lowercase(), style);
    }

    /// Override background/highlight for one domain type, keeping the base
    /// type's shape and font.
    pub fn register_type_color(&mut self, node_type: &str, background: &str, highlight: &str) {
        self.type_colors.insert(
            node_type.to_string(),
            (background.to_string(), highlight.to_string()),
        );
    }

    pub fn register_core_seed_defaults(&mut self) {
        let seeds = [
            (BASE_TYPE_ENTITY, "#5bc2e7", "#85d3ef", "#000000", NodeShape::Box),
            (BASE_TYPE_RELATION, "#77dd77", "#9be79b", "#000000", NodeShape::Diamond),
            (BASE_TYPE_ATTRIBUTE, "#ffb347", "#ffc878", "#000000", NodeShape::Ellipse),
            (BASE_TYPE_ROLE, "#cf9fff", "#ddbbff", "#000000", NodeShape::Hexagon),
            (BASE_TYPE_RULE, "#ff6961", "#ff8f89", "#000000", NodeShape::Triangle),
            (BASE_TYPE_SCHEMA, "#a9a9a9", "#c4c4c4", "#000000", NodeShape::Dot),
            (BASE_TYPE_FALLBACK, "#e0e0e0", "#f0f0f0", "#000000", NodeShape::Ellipse),
        ];
        for (id, background, highlight, font_color, shape) in seeds {
            self.register(
                id,
                BaseTypeStyle {
                    background: background.to_string(),
                    highlight: highlight.to_string(),
                    font_color: font_color.to_string(),
                    shape,
                },
            );
        }
    }

    pub fn resolve(&self, base_type: &str) -> StyleResolution {
        let requested = base_type.trim().to_ascii_lowercase();
        let fallback_style = self
            .base_types
            .get(&self.fallback_id)
            .cloned()
            .unwrap_or(BaseTypeStyle {
                background: "#e0e0e0".to_string(),
                highlight: "#f0f0f0".to_string(),
                font_color: "#000000".to_string(),
                shape: NodeShape::Ellipse,
            });

        if !requested.is_empty()
            && let Some(style) = self.base_types.get(&requested).cloned()
        {
            return StyleResolution {
                requested_id: requested.clone(),
                resolved_id: requested,
                fallback_used: false,
                style,
            };
        }

        StyleResolution {
            requested_id: requested,
            resolved_id: self.fallback_id.clone(),
            fallback_used: true,
            style: fallback_style,
        }
    }
}

impl StyleProvider for ThemeRegistry {
    fn node_presentation(&self, node_type: &str, base_type: &str) -> NodePresentation {
        let resolution = self.resolve(base_type);
        if resolution.fallback_used {
            debug!(
                "No style for base type {:?} of {node_type}; using {}",
                resolution.requested_id, resolution.resolved_id
            );
        }
        let style = resolution.style;
        let (background, highlight) = self
            .type_colors
            .get(node_type)
            .map(|(bg, hl)| (bg.as_str(), hl.as_str()))
            .unwrap_or((style.background.as_str(), style.highlight.as_str()));
        NodePresentation {
            color: NodeColor::flat(background, highlight),
            font: FontStyle {
                color: style.font_color.clone(),
                size: None,
            },
            shape: style.shape,
        }
    }

    fn edge_presentation(&self) -> EdgePresentation {
        self.edge.clone()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            base_types: HashMap::new(),
            type_colors: HashMap::new(),
            fallback_id: BASE_TYPE_FALLBACK.to_string(),
            edge: EdgePresentation {
                color: EdgeColor {
                    color: "#848484".to_string(),
                    highlight: "#5bc2e7".to_string(),
                    hover: "#5bc2e7".to_string(),
                },
                font: FontStyle {
                    color: "#343434".to_string(),
                    size: Some(12.0),
                },
            },
        };
        registry.register_core_seed_defaults();
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_registry_resolves_known_base_type() {
        let registry = ThemeRegistry::default();
        let resolution = registry.resolve("Relation");

        assert!(!resolution.fallback_used);
        assert_eq!(resolution.resolved_id, BASE_TYPE_RELATION);
        assert_eq!(resolution.style.shape, NodeShape::Diamond);
    }

    #[test]
    fn theme_registry_falls_back_for_unknown_base_type() {
        let registry = ThemeRegistry::default();
        let resolution = registry.resolve("inference-type");

        assert!(resolution.fallback_used);
        assert_eq!(resolution.requested_id, "inference-type");
        assert_eq!(resolution.resolved_id, BASE_TYPE_FALLBACK);
    }

    #[test]
    fn node_presentation_uses_borderless_bundle() {
        let registry = ThemeRegistry::default();
        let presentation = registry.node_presentation("person", BASE_TYPE_ENTITY);

        assert_eq!(presentation.shape, NodeShape::Box);
        assert_eq!(presentation.color.border, presentation.color.background);
        assert_eq!(
            presentation.color.highlight.border,
            presentation.color.highlight.background
        );
        assert_eq!(presentation.color.hover, presentation.color.highlight);
    }

    #[test]
    fn type_color_override_keeps_base_shape() {
        let mut registry = ThemeRegistry::default();
        registry.register_type_color("person", "#111111", "#222222");
        let presentation = registry.node_presentation("person", BASE_TYPE_ENTITY);

        assert_eq!(presentation.color.background, "#111111");
        assert_eq!(presentation.color.hover.background, "#222222");
        assert_eq!(presentation.shape, NodeShape::Box);
    }

    #[test]
    fn unknown_base_type_gets_fallback_presentation() {
        let registry = ThemeRegistry::default();
        let presentation = registry.node_presentation("widget", "inference-type");

        assert_eq!(presentation.shape, NodeShape::Ellipse);
        assert_eq!(presentation.color.background, "#e0e0e0");
    }
}
