//! Colored terminal report for an [`Analysis`].
//!
//! Layout, top to bottom: header, overall Seq-Logprob line (only when the
//! response carried logprobs), per-token table, full completion text.

use std::fmt;

use console::Style;
use tokenlens_core::{Analysis, ColorTier, ConfidenceLevel, SequenceStats, TokenStat};

const RULE_WIDTH: usize = 70;
const TABLE_RULE_WIDTH: usize = 55;
const OVERALL_BAR_WIDTH: usize = 20;
const TOKEN_BAR_WIDTH: usize = 15;
const TOKEN_DISPLAY_CHARS: usize = 12;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Horizontal bar of `width` cells, `floor(p * width)` of them filled.
///
/// `probability` is clamped to [0, 1] first so malformed input cannot
/// overflow the bar.
pub fn confidence_bar(probability: f64, width: usize) -> String {
    let filled = (probability.clamp(0.0, 1.0) * width as f64).floor() as usize;
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));
    bar
}

/// Token text with whitespace and non-printable characters made visible, cut
/// to twelve characters plus an ellipsis.
///
/// Anything `char::escape_debug` would escape (controls, format characters
/// such as U+200B, non-space separators) is written as `\xNN`, `\uNNNN` or
/// `\UNNNNNNNN`, so every displayed character occupies a column.
pub fn display_token(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\\' => escaped.push_str("\\\\"),
            '"' | '\'' => escaped.push(c),
            c if c.escape_debug().len() > 1 => escaped.push_str(&escape_code_point(c)),
            c => escaped.push(c),
        }
    }

    if escaped.chars().count() > TOKEN_DISPLAY_CHARS {
        let mut truncated: String = escaped.chars().take(TOKEN_DISPLAY_CHARS).collect();
        truncated.push('…');
        truncated
    } else {
        escaped
    }
}

fn escape_code_point(c: char) -> String {
    let code = c as u32;
    if code < 0x100 {
        format!("\\x{code:02x}")
    } else if code <= 0xffff {
        format!("\\u{code:04x}")
    } else {
        format!("\\U{code:08x}")
    }
}

fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Colors on only when stdout is a terminal that supports them.
    pub fn for_stdout() -> Self {
        Self::new(console::colors_enabled())
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn report<'a>(&self, analysis: &'a Analysis) -> Report<'a> {
        Report {
            analysis,
            renderer: *self,
        }
    }

    fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors)
    }

    fn tier_style(&self, tier: ColorTier) -> Style {
        let style = match tier {
            ColorTier::Confident => Style::new().green(),
            ColorTier::Hesitant => Style::new().yellow(),
            ColorTier::Doubtful => Style::new().red(),
        };
        self.style(style.bright())
    }

    fn probability_style(&self, probability: f64) -> Style {
        self.tier_style(ConfidenceLevel::from_probability(probability).tier())
    }

    fn bold(&self) -> Style {
        self.style(Style::new().bold())
    }

    fn dim(&self) -> Style {
        self.style(Style::new().dim())
    }
}

/// Display adapter producing the full report.
pub struct Report<'a> {
    analysis: &'a Analysis,
    renderer: Renderer,
}

impl Report<'_> {
    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bold = self.renderer.bold();
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "{} {}", bold.apply_to("Prompt:"), self.analysis.prompt)?;
        writeln!(
            f,
            "{} {} | {} {}",
            bold.apply_to("Model:"),
            self.analysis.model,
            bold.apply_to("Temperature:"),
            self.analysis.temperature
        )?;
        writeln!(f, "{rule}")
    }

    fn write_overall(&self, f: &mut fmt::Formatter<'_>, stats: &SequenceStats) -> fmt::Result {
        let style = self.renderer.probability_style(stats.avg_probability);

        writeln!(f)?;
        writeln!(
            f,
            "{}",
            self.renderer.bold().apply_to("Overall Confidence (Seq-Logprob):")
        )?;
        writeln!(
            f,
            "  {} {} avg | logprob: {:.4} | perplexity: {:.2}",
            style.apply_to(confidence_bar(stats.avg_probability, OVERALL_BAR_WIDTH)),
            percent(stats.avg_probability),
            stats.avg_logprob,
            stats.perplexity
        )
    }

    fn write_token_table(&self, f: &mut fmt::Formatter<'_>, tokens: &[TokenStat]) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.renderer.bold().apply_to("Token Analysis:"))?;
        writeln!(f, "  {:<15} {:>8} {:>10}  Bar", "Token", "Prob", "Logprob")?;
        writeln!(f, "  {}", "-".repeat(TABLE_RULE_WIDTH))?;

        for token in tokens {
            let style = self.renderer.probability_style(token.probability);
            writeln!(
                f,
                "  {:<15} {} {:>10.4}  {}",
                display_token(&token.token),
                style.apply_to(format!("{:>7}", percent(token.probability))),
                token.logprob,
                style.apply_to(confidence_bar(token.probability, TOKEN_BAR_WIDTH))
            )?;
        }
        Ok(())
    }

    fn write_completion(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.renderer.bold().apply_to("Complete Response:"))?;
        writeln!(
            f,
            "  {}",
            self.renderer
                .dim()
                .apply_to(&self.analysis.result.completion_text)
        )?;
        writeln!(f)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.analysis.result;

        self.write_header(f)?;
        if let Some(stats) = &result.sequence_stats {
            self.write_overall(f, stats)?;
        }
        self.write_token_table(f, &result.token_stats)?;
        self.write_completion(f)
    }
}
