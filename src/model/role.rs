//! Semantic roles attached to structural nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic tag describing what a structural unit is.
///
/// A node may carry several roles; classification ambiguity falls back to
/// [`Role::Unclassified`], which downstream consumers must treat as valid
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A section or document heading
    Heading,
    /// Regular body text
    BodyText,
    /// A figure or table caption
    Caption,
    /// A bibliographic reference entry
    Reference,
    /// Tabular content
    Table,
    /// A visual divider
    Separator,
    /// A running page header
    Header,
    /// A running page footer
    Footer,
    /// Author affiliation block
    Affiliation,
    /// An inline citation block
    Citation,
    /// A figure legend
    FigureLegend,
    /// A keywords/index-terms block
    Keywords,
    /// No rule matched
    Unclassified,
}

impl Role {
    /// Whether this role can serve as the "section" inherited by following
    /// chunks. Auxiliary roles (affiliations, citations, figure legends,
    /// footers, headers, keywords, separators, tables, unclassified)
    /// never do.
    pub fn is_main_section(&self) -> bool {
        !matches!(
            self,
            Role::Affiliation
                | Role::Citation
                | Role::FigureLegend
                | Role::Footer
                | Role::Header
                | Role::Keywords
                | Role::Separator
                | Role::Table
                | Role::Unclassified
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Heading => "heading",
            Role::BodyText => "body_text",
            Role::Caption => "caption",
            Role::Reference => "reference",
            Role::Table => "table",
            Role::Separator => "separator",
            Role::Header => "header",
            Role::Footer => "footer",
            Role::Affiliation => "affiliation",
            Role::Citation => "citation",
            Role::FigureLegend => "figure_legend",
            Role::Keywords => "keywords",
            Role::Unclassified => "unclassified",
        };
        write!(f, "{}", s)
    }
}
