//! Document-level style context.
//!
//! The preference store publishes the active theme here as named style
//! variables; the view layer resolves every color it draws with from these
//! variables rather than from the store. A publication replaces all eight
//! variables under one write lock and bumps the frame counter once, so a
//! reader never observes a half-applied theme.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use crate::theme::{ThemeDefinition, STYLE_VARIABLE_NAMES};

#[derive(Debug, Default)]
struct StyleVariables {
    values: BTreeMap<&'static str, String>,
    frame: u64,
}

/// Shared handle to the style variables. Clones point at the same root.
#[derive(Debug, Clone, Default)]
pub struct StyleRoot {
    inner: Arc<RwLock<StyleVariables>>,
}

impl StyleRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every variable of `theme` as a single frame.
    pub fn publish_theme(&self, theme: &ThemeDefinition) {
        let mut vars = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for (name, value) in theme.style_variables() {
            vars.values.insert(name, value.to_string());
        }
        vars.frame += 1;
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).values.get(name).cloned()
    }

    /// Number of frames published so far.
    pub fn frame(&self) -> u64 {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).frame
    }

    /// All published variables in publication order.
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let vars = self.inner.read().unwrap_or_else(|e| e.into_inner());
        STYLE_VARIABLE_NAMES
            .iter()
            .filter_map(|name| vars.values.get(name).map(|value| (*name, value.clone())))
            .collect()
    }

    /// Render the variables as a CSS `:root` block.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.variables() {
            let _ = writeln!(css, "  --{}: {};", name, value);
        }
        css.push_str("}\n");
        css
    }

    /// Resolve a variable to an opaque RGB triple. Gradients resolve to their
    /// first stop; translucent colors are composited over black.
    pub fn rgb(&self, name: &str) -> Option<(u8, u8, u8)> {
        let value = self.get(name)?;
        if value.trim_start().starts_with("linear-gradient") {
            gradient_stops(&value).into_iter().next().and_then(|(color, _)| parse_color(&color))
        } else {
            parse_color(&value)
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(value: &str) -> Option<(u8, u8, u8)> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let (args, has_alpha) = if let Some(rest) = value.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = value.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let r: u8 = parts[0].parse().ok()?;
    let g: u8 = parts[1].parse().ok()?;
    let b: u8 = parts[2].parse().ok()?;
    let alpha: f32 = if has_alpha { parts[3].parse().ok()? } else { 1.0 };
    let alpha = alpha.clamp(0.0, 1.0);
    let blend = |c: u8| (f32::from(c) * alpha).round() as u8;
    Some((blend(r), blend(g), blend(b)))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Split a `linear-gradient(...)` into `(color, stop percent)` pairs. The
/// direction argument is skipped.
pub fn gradient_stops(value: &str) -> Vec<(String, u8)> {
    let Some(body) = value
        .trim()
        .strip_prefix("linear-gradient(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Vec::new();
    };

    // Commas inside rgba(...) are not stop separators.
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => args.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    args.push(current);

    args.iter()
        .filter_map(|arg| {
            let arg = arg.trim();
            let (color, stop) = arg.rsplit_once(' ')?;
            let percent = stop.strip_suffix('%')?.parse().ok()?;
            Some((color.trim().to_string(), percent))
        })
        .collect()
}
