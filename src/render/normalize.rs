//! LaTeX-flavoured math cleanup. Turns the inline math that language models
//! like to emit into plain Unicode text that a terminal can display.

use regex::{Captures, Regex};

const MATH_DELIMITER: char = '$';

lazy_static::lazy_static! {
    static ref FRACTION_RE: Regex = Regex::new(r"\\frac\{([^{}]*)\}\{([^{}]*)\}").unwrap();
    static ref SUPERSCRIPT_RE: Regex = Regex::new(r"\^(?:\{([^{}]*)\}|(.))").unwrap();
    static ref SUBSCRIPT_RE: Regex = Regex::new(r"_(?:\{([^{}]*)\}|(.))").unwrap();
    static ref STYLE_RE: Regex =
        Regex::new(r"\\(?:text|mathbf|mathit|mathrm)\{([^{}]*)\}").unwrap();
    static ref MACRO_RE: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
}

/// Convert math markup into Unicode text. Never fails; anything it does not
/// recognise is left in place.
///
/// Steps run in a fixed order: fractions and scripts are rewritten before
/// named macros so that brace-delimited arguments are still intact.
pub fn normalize(raw: &str) -> String {
    let text: String = raw.chars().filter(|c| *c != MATH_DELIMITER).collect();
    let text = FRACTION_RE.replace_all(&text, "($1/$2)");
    let text = SUPERSCRIPT_RE.replace_all(&text, |caps: &Captures| {
        map_script(caps, to_superscript)
    });
    let text = SUBSCRIPT_RE.replace_all(&text, |caps: &Captures| map_script(caps, to_subscript));
    let text = STYLE_RE.replace_all(&text, "$1");
    let text = MACRO_RE.replace_all(&text, |caps: &Captures| match symbol_for(&caps[1]) {
        Some(symbol) => symbol.to_string(),
        None => caps[0].to_string(),
    });
    text.into_owned()
}

fn map_script(caps: &Captures, table: fn(char) -> char) -> String {
    let body = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or("");
    body.chars().map(table).collect()
}

fn to_superscript(c: char) -> char {
    match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '(' => '⁽',
        ')' => '⁾',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'i' => 'ⁱ',
        'n' => 'ⁿ',
        'x' => 'ˣ',
        'y' => 'ʸ',
        _ => c,
    }
}

// Letter coverage differs from to_superscript: no b/c/d/y here,
// and j/o have no superscript entry.
fn to_subscript(c: char) -> char {
    match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'x' => 'ₓ',
        _ => c,
    }
}

fn symbol_for(name: &str) -> Option<&'static str> {
    let symbol = match name {
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "cdot" => "·",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "infty" => "∞",
        "rightarrow" | "to" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "Leftrightarrow" => "⇔",
        "in" => "∈",
        "notin" => "∉",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "cup" => "∪",
        "cap" => "∩",
        "emptyset" => "∅",
        "forall" => "∀",
        "exists" => "∃",
        "sum" => "∑",
        "int" => "∫",
        "partial" => "∂",
        "nabla" => "∇",
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "Delta" => "Δ",
        "epsilon" => "ε",
        "theta" => "θ",
        "lambda" => "λ",
        "mu" => "μ",
        "pi" => "π",
        "sigma" => "σ",
        "Sigma" => "Σ",
        "phi" => "φ",
        "omega" => "ω",
        "Omega" => "Ω",
        "sqrt" => "√",
        "circ" => "°",
        "angle" => "∠",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_delimiters_and_applies_scripts() {
        assert_eq!(normalize("$x^{2}+y_{1}$"), "x²+y₁");
    }

    #[test]
    fn test_fraction_then_symbols() {
        assert_eq!(normalize("\\frac{1}{2} \\times \\pi"), "(1/2) × π");
    }

    #[test]
    fn test_single_char_scripts() {
        assert_eq!(normalize("e^x + a_n"), "eˣ + aₙ");
        assert_eq!(normalize("10^-3"), "10⁻3");
    }

    #[test]
    fn test_nested_fraction_is_not_rewritten() {
        // Only single-level brace groups match, so the outer frac survives.
        let out = normalize("\\frac{\\frac{1}{2}}{3}");
        assert!(out.starts_with("\\frac{"));
        assert!(out.contains("(1/2)"));
    }

    #[test]
    fn test_style_macros_are_unwrapped() {
        assert_eq!(normalize("\\text{speed} = \\mathbf{v}"), "speed = v");
        assert_eq!(normalize("\\mathit{k}\\mathrm{m}"), "km");
    }

    #[test]
    fn test_unknown_macro_passes_through() {
        assert_eq!(normalize("\\unknownmacro x"), "\\unknownmacro x");
    }

    #[test]
    fn test_degree_and_angle() {
        assert_eq!(normalize("$\\angle ABC = 90^\\circ$"), "∠ ABC = 90°");
    }

    #[test]
    fn test_greek_and_arrows() {
        assert_eq!(
            normalize("\\alpha \\to \\beta, \\Delta x \\geq 0"),
            "α → β, Δ x ≥ 0"
        );
    }

    #[test]
    fn test_script_table_asymmetry_is_preserved() {
        // Known quirk: superscript covers b/c/d/y, subscript covers j/o.
        assert_eq!(normalize("x^{b}"), "xᵇ");
        assert_eq!(normalize("x_{b}"), "xb");
        assert_eq!(normalize("x^{y}"), "xʸ");
        assert_eq!(normalize("x_{y}"), "xy");
        assert_eq!(normalize("x_{j}"), "xⱼ");
        assert_eq!(normalize("x^{j}"), "xj");
        assert_eq!(normalize("x_{o}"), "xₒ");
        assert_eq!(normalize("x^{o}"), "xo");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize("Nothing to see here."), "Nothing to see here.");
        assert_eq!(normalize(""), "");
    }
}
