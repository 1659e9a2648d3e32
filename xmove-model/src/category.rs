use std::fmt::{self, Display, Formatter};

use crate::error::{ModelError, Result};

/// Position of a block in the fixed course hierarchy.
///
/// The chain is strictly ordered: a node of one category only ever holds
/// children of the next category down, and a component holds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// The outline root
    Course = 0,
    /// Studio `chapter`
    Section = 1,
    /// Studio `sequential`
    Subsection = 2,
    /// Studio `vertical`
    Unit = 3,
    /// Any leaf block (`html`, `problem`, `video`, ...)
    Component = 4,
}

const CHAIN: [Category; 5] = [
    Category::Course,
    Category::Section,
    Category::Subsection,
    Category::Unit,
    Category::Component,
];

impl Category {
    /// Every category, root first.
    pub const ALL: [Category; 5] = CHAIN;

    /// Distance from the outline root.
    pub const fn depth(self) -> usize {
        self as usize
    }

    pub fn from_depth(depth: usize) -> Option<Self> {
        CHAIN.get(depth).copied()
    }

    /// Category every child of this category must have.
    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }

    /// Category of a node able to hold this category as a child.
    pub fn parent(self) -> Option<Self> {
        self.depth().checked_sub(1).and_then(Self::from_depth)
    }

    /// Classify a Studio block type.
    ///
    /// Structural blocks are recognised by their Studio names (`chapter`,
    /// `sequential`, `vertical`) or the generic ones (`section`, ...). Any
    /// other non-empty block type is a leaf.
    pub fn from_block_type(block_type: &str) -> Result<Self> {
        match block_type.trim() {
            "" => Err(ModelError::EmptyCategory),
            "course" => Ok(Category::Course),
            "chapter" | "section" => Ok(Category::Section),
            "sequential" | "subsection" => Ok(Category::Subsection),
            "vertical" | "unit" => Ok(Category::Unit),
            _ => Ok(Category::Component),
        }
    }

    /// Block type Studio uses on the wire for structural categories.
    pub const fn studio_block_type(self) -> &'static str {
        match self {
            Category::Course => "course",
            Category::Section => "chapter",
            Category::Subsection => "sequential",
            Category::Unit => "vertical",
            Category::Component => "component",
        }
    }

    /// Lowercase singular name used in user-facing text.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Course => "course",
            Category::Section => "section",
            Category::Subsection => "subsection",
            Category::Unit => "unit",
            Category::Component => "component",
        }
    }

    /// Heading used above a list of blocks of this category.
    pub const fn plural_heading(self) -> &'static str {
        match self {
            Category::Course => "Courses",
            Category::Section => "Sections",
            Category::Subsection => "Subsections",
            Category::Unit => "Units",
            Category::Component => "Components",
        }
    }

    pub fn is_leaf(self) -> bool {
        self == Category::Component
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
