#![forbid(unsafe_code)]

//! Rendered output of a crossfade.
//!
//! A [`Container`] is what the host receives each frame: one styled
//! container holding one [`AnimatedItem`] per live transition item. Items
//! borrow the content; the host decides how to draw it.

use std::fmt::{self, Display, Write as _};

use fadeglot_core::animation::StyleFrame;

use crate::transition::{Generation, ItemSnapshot, TransitionPhase};

/// One transition item wrapping the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedItem<'a, C> {
    pub key: Generation,
    pub phase: TransitionPhase,
    pub style: StyleFrame,
    pub content: &'a C,
}

impl<'a, C> AnimatedItem<'a, C> {
    pub(crate) fn new(snapshot: ItemSnapshot, content: &'a C) -> Self {
        Self {
            key: snapshot.key,
            phase: snapshot.phase,
            style: snapshot.style,
            content,
        }
    }

    /// CSS declarations equivalent to this item's style.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "opacity: {}; transform: translate3d(0, {}px, 0)",
            round3(self.style.opacity),
            round3(self.style.y_offset)
        )
    }
}

/// Container holding the items of a crossfade, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<'a, C> {
    /// Styling identifier; empty when none was supplied.
    pub class_name: &'a str,
    pub items: Vec<AnimatedItem<'a, C>>,
}

impl<C> Container<'_, C> {
    /// The item that is not leaving.
    #[must_use]
    pub fn current(&self) -> Option<&AnimatedItem<'_, C>> {
        self.items
            .iter()
            .rev()
            .find(|item| item.phase != TransitionPhase::Leaving)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Generation> {
        self.items.iter().map(|item| item.key).collect()
    }
}

impl<C: Display> Container<'_, C> {
    /// Serialize as HTML. Class names and content are escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl<C: Display> Display for Container<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<div class=\"{}\">",
            v_htmlescape::escape(self.class_name)
        )?;
        for item in &self.items {
            let mut content = String::new();
            write!(content, "{}", item.content)?;
            write!(
                f,
                "<div data-key=\"{}\" data-phase=\"{}\" style=\"{}\">{}</div>",
                item.key,
                phase_name(item.phase),
                item.css(),
                v_htmlescape::escape(&content)
            )?;
        }
        f.write_str("</div>")
    }
}

fn phase_name(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Entering => "entering",
        TransitionPhase::Resident => "resident",
        TransitionPhase::Leaving => "leaving",
    }
}

/// Round to 3 decimals and drop negative zero.
fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
