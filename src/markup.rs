//! Markdown-subset → HTML renderer for generated hints.
//!
//! [`render`] runs a fixed, ordered pipeline of small pure passes:
//!
//! 1. [`escape_html`]: `&`, `<`, `>` become entities
//! 2. [`render_bold`]: `**x**` → `<strong>x</strong>`
//! 3. [`render_headings`]: line-leading `#`/`##`/`###` → `<h1>`–`<h3>`
//! 4. [`render_lists`]: line-leading `* item` → one `<ul>` per run of items
//! 5. [`render_code_blocks`]: ```` ``` ```` or `"""` fences → `<pre><code>`
//! 6. [`render_inline_code`]: `` `x` `` → `<code>x</code>`
//!
//! Escaping has to run first: every later pass emits tags, and escaping after
//! them would turn those tags back into text.  For the same reason the
//! pipeline is single-pass and **not** idempotent: feeding rendered output
//! back in re-escapes the generated markup.
//!
//! Anything a pass does not recognise (an unmatched `**`, a lone backtick, an
//! unterminated fence) is left as literal text.  No pass can fail.
//!
//! Lists are single-level only; indented `* ` lines are not list items.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").expect("bold regex"));

static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### +(.*?)(\r?)$").expect("h3 regex"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## +(.*?)(\r?)$").expect("h2 regex"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# +(.*?)(\r?)$").expect("h1 regex"));

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\* +(.*?)(\r?)$").expect("list item regex"));
static ADJACENT_LISTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</ul>\r?\n<ul>").expect("adjacent list regex"));

static BACKTICK_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:[\w+.-]+\r?\n|\r?\n)?(.*?)```").expect("backtick fence regex")
});
static QUOTE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"""(?:[\w+.-]+\r?\n|\r?\n)?(.*?)""""#).expect("quote fence regex")
});

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code regex"));

/// Render generated hint text into display markup.
///
/// ```
/// use code_timer::markup::render;
///
/// assert_eq!(render("A & B"), "A &amp; B");
/// assert_eq!(render("**bold**"), "<strong>bold</strong>");
/// assert_eq!(render("<script>"), "&lt;script&gt;");
/// ```
pub fn render(text: &str) -> String {
    let html = escape_html(text);
    let html = render_bold(&html);
    let html = render_headings(&html);
    let html = render_lists(&html);
    let html = render_code_blocks(&html);
    render_inline_code(&html)
}

/// Escape the three characters that could open markup.  `&` goes first so
/// the entities produced for `<` and `>` are not escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn render_bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>${1}</strong>").into_owned()
}

/// Deepest level first so `###` is never read as `#` + `##text`.
pub fn render_headings(text: &str) -> String {
    let html = H3.replace_all(text, "<h3>${1}</h3>${2}");
    let html = H2.replace_all(&html, "<h2>${1}</h2>${2}");
    H1.replace_all(&html, "<h1>${1}</h1>${2}").into_owned()
}

/// Wrap every `* item` line in its own `<ul><li>…</li></ul>`, then merge
/// lists on consecutive lines into one.
pub fn render_lists(text: &str) -> String {
    let html = LIST_ITEM.replace_all(text, "<ul><li>${1}</li></ul>${2}");
    ADJACENT_LISTS.replace_all(&html, "").into_owned()
}

/// Fenced blocks, backtick fences first.  A language tag on the opening
/// fence line is dropped.
pub fn render_code_blocks(text: &str) -> String {
    let html = BACKTICK_FENCE.replace_all(text, "<pre><code>${1}</code></pre>");
    QUOTE_FENCE
        .replace_all(&html, "<pre><code>${1}</code></pre>")
        .into_owned()
}

pub fn render_inline_code(text: &str) -> String {
    INLINE_CODE.replace_all(text, "<code>${1}</code>").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
