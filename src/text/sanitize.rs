//! Regex rule tables that convert LaTeX-ish OCR output into plain math
//! notation and repair common escaping artifacts.
//!
//! Three tables, one per stage of the flow:
//! - provider: raw model output, straight off the wire
//! - question: a recognition result about to be shown in the editor
//! - math-like: full cleanup for display anywhere else (idempotent)

use regex::Regex;
use std::sync::OnceLock;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn compile(table: &[(&str, &'static str)]) -> Vec<Rule> {
    table
        .iter()
        .map(|(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).expect("static regex"),
            replacement,
        })
        .collect()
}

fn apply(rules: &[Rule], text: &str) -> String {
    rules.iter().fold(text.to_string(), |acc, rule| {
        rule.pattern.replace_all(&acc, rule.replacement).into_owned()
    })
}

fn math_like_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"\\{2,}", r"\"),
            (r"\r\n", "\n"),
            (r"\*\*(.*?)\*\*", "${1}"),
            (r"__(.*?)__", "${1}"),
            (r"`([^`]+)`", "${1}"),
            (r"\$\$([^$]+)\$\$", "${1}"),
            (r"\$([^$]+)\$", "${1}"),
            (r"\\\((.*?)\\\)", "${1}"),
            (r"\\\[(.*?)\\\]", "${1}"),
            (r"\\left\s*([(\[{|])", "${1}"),
            (r"\\right\s*([)\]}|])", "${1}"),
            (r"\\left|\\right", ""),
            (r"\\frac\s*\{([^{}]+)\}\s*\{([^{}]+)\}", "(${1})/(${2})"),
            (r"\\times|\\cdot", "×"),
            (r"\\div", "÷"),
            (r"\\leq\b|\\le\b", "≤"),
            (r"\\geq\b|\\ge\b", "≥"),
            (r"\\neq\b", "≠"),
            (r"\\approx\b", "≈"),
            (r"\\text\s*\{([^}]*)\}", "${1}"),
            (r"\\operatorname\s*\{([^}]*)\}", "${1}"),
            (r"\\[a-zA-Z]+", ""),
            (r"[{}]", ""),
            (r"\s*([=+\-×÷<>≤≥≠≈])\s*", " ${1} "),
            (r"\(\s+", "("),
            (r"\s+\)", ")"),
            (r"[ \t]{2,}", " "),
            (r"\n{3,}", "\n\n"),
        ])
    })
}

fn question_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"\\frac\s*\{([^{}]+)\}\s*\{([^{}]+)\}", "${1}/${2}"),
            (r"\$\$([^$]+)\$\$", "${1}"),
            (r"\$([^$]+)\$", "${1}"),
            (r"\\\((.*?)\\\)", "${1}"),
            (r"\\\[(.*?)\\\]", "${1}"),
            (r"\\times|\\cdot", "×"),
            (r"\\div", "÷"),
            (r"\\leq\b|\\le\b", "≤"),
            (r"\\geq\b|\\ge\b", "≥"),
            (r"[{}]", ""),
        ])
    })
}

fn provider_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"(?i)```(?:markdown|md|text)?", ""),
            (r"\r\n", "\n"),
            (r"\\frac\s*\{([^{}]+)\}\s*\{([^{}]+)\}", "${1}/${2}"),
            // Vision models emit a tab where a multiplication sign was.
            (r"\t+", " × "),
            (r"\\times|\\cdot", "×"),
            (r"\\div", "÷"),
            (r"\\leq\b|\\le\b", "≤"),
            (r"\\geq\b|\\ge\b", "≥"),
            (r"\\neq", "≠"),
            (r"\\approx", "≈"),
            (r"\$\$([^$]+)\$\$", "${1}"),
            (r"\$([^$]+)\$", "${1}"),
            (r"\\\((.*?)\\\)", "${1}"),
            (r"\\\[(.*?)\\\]", "${1}"),
            (r"(?m)^[ \t]*\$\$[ \t]*$", ""),
            (r"(?m)\$\$[ \t]*$", ""),
            (r"[{}]", ""),
            (r"[ \t]{2,}", " "),
            (r"\n{3,}", "\n\n"),
        ])
    })
}

/// Full cleanup of math-like text: collapse escape runs, strip markdown
/// emphasis/code markers, unwrap math delimiters, replace LaTeX macros with
/// Unicode glyphs, drop residual braces and tidy whitespace.
///
/// Idempotent: rules are re-applied until the text stops changing. Each
/// pass unwraps one level of nested delimiters.
pub fn normalize_math_like_text(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = apply(math_like_rules(), &text).trim().to_string();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Lighter cleanup applied to a recognition result before it is shown.
pub fn normalize_question_text(raw: &str) -> String {
    apply(question_rules(), raw).trim().to_string()
}

/// Cleanup of raw vision-model output: code fences, tab artifacts,
/// macros, delimiters and dangling `$$` lines.
pub fn normalize_provider_text(raw: &str) -> String {
    apply(provider_rules(), raw).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_operator_macros() {
        assert_eq!(normalize_math_like_text(r"$3 \times 4 \div 2 \leq 7$"), "3 × 4 ÷ 2 ≤ 7");
        assert_eq!(normalize_math_like_text(r"a \neq b, c \approx d"), "a ≠ b, c ≈ d");
    }

    #[test]
    fn collapses_repeated_escapes() {
        assert_eq!(normalize_math_like_text(r"5 \\\\times 6"), "5 × 6");
    }

    #[test]
    fn unwraps_fractions_and_text() {
        assert_eq!(
            normalize_math_like_text(r"\frac{1}{2} of \text{apples}"),
            "(1)/(2) of apples"
        );
        assert_eq!(normalize_math_like_text(r"\left( x \right)"), "(x)");
    }

    #[test]
    fn strips_markdown_markers() {
        assert_eq!(normalize_math_like_text("**Question** `x=1` __bold__"), "Question x = 1 bold");
    }

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(normalize_math_like_text("line one\r\n\r\n\r\n\r\nline two"), "line one\n\nline two");
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        let inputs = [
            "",
            "   ",
            r"$$a$ $b$$",
            r"*\alpha*bc*\beta*",
            r"\\\\frac{\\left( 1 \\right)}{2}",
            "x-axis and y=-3 (  -2 )",
            "= leading operator",
            "a =\nb\n\n\n\nc  ",
            r"\( \sqrt{2} \) and \[x^2\]",
            "**unclosed bold and `tick",
            r"$$ dangling",
            "选择题：下列各式中 $x\\times y$ 的值是（  ）",
        ];
        let nested = [
            format!("{}abc{}", r"\(".repeat(40), r"\)".repeat(40)),
            format!("{}y = 1{}", r"\[".repeat(64), r"\]".repeat(64)),
        ];
        for input in inputs.iter().copied().chain(nested.iter().map(String::as_str)) {
            let once = normalize_math_like_text(input);
            let twice = normalize_math_like_text(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn deeply_nested_delimiters_fully_unwrap() {
        for (open, close) in [(r"\(", r"\)"), (r"\[", r"\]")] {
            let input = format!("{}abc{}", open.repeat(40), close.repeat(40));
            let once = normalize_math_like_text(&input);
            assert_eq!(once, "abc");
            assert_eq!(normalize_math_like_text(&once), once);
        }
        let mixed = format!("{}x{}", r"\(\[".repeat(30), r"\]\)".repeat(30));
        let once = normalize_math_like_text(&mixed);
        assert_eq!(normalize_math_like_text(&once), once, "not idempotent for nested mix");
    }

    #[test]
    fn question_text_light_cleanup() {
        assert_eq!(normalize_question_text(r" $\frac{3}{4} \times 8$ = ? "), "3/4 × 8 = ?");
        assert_eq!(normalize_question_text(r"\(x \ge 2\)"), "x ≥ 2");
    }

    #[test]
    fn provider_text_strips_fences_and_dangling_math() {
        let raw = "```markdown\n1. Compute 3\t4\n$$\n```";
        assert_eq!(normalize_provider_text(raw), "1. Compute 3 × 4");
    }

    #[test]
    fn provider_text_keeps_paired_math() {
        assert_eq!(normalize_provider_text(r"Solve $$x \leq 5$$ now"), "Solve x ≤ 5 now");
    }
}
