//! Hint requests and the prompt built from them.
//!
//! [`PromptBuilder`] turns a [`HintRequest`] into one natural-language prompt
//! naming the programming language, the learner's specification and the
//! target response length.  The instructions come in English (`"en"`) and
//! Japanese (`"ja"`); any other locale falls back to English.

/// Bounds of the requested hint length, in characters.
pub const MIN_LEVEL: i64 = 200;
pub const MAX_LEVEL: i64 = 600;

// ---------------------------------------------------------------------------
// HintRequest
// ---------------------------------------------------------------------------

/// One hint request from the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub language: String,
    pub specification: String,
    /// Target response length in characters, always within
    /// `[MIN_LEVEL, MAX_LEVEL]`.
    pub level: u32,
}

impl HintRequest {
    /// Build a request, clamping `level` into range.
    pub fn new(language: impl Into<String>, specification: impl Into<String>, level: i64) -> Self {
        Self {
            language: language.into(),
            specification: specification.into(),
            level: level.clamp(MIN_LEVEL, MAX_LEVEL) as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

const INSTRUCTION_EN: &str = "\
You are a programming mentor helping a learner who is writing code against a countdown.
Give a short hint that gets them moving without handing over the complete solution.

Rules:
1. Point at the approach, the key data structure, or the standard-library functions to reach for.
2. Show at most a few lines of code.
3. You may use **bold**, `inline code`, # headings, * bullet lists and ``` fenced code blocks.
4. Reply with the hint only.";

const INSTRUCTION_JA: &str = "\
あなたはプログラミングのメンターです。学習者は制限時間内にコードを書いています。
完全な解答は渡さずに、手を動かし始められる短いヒントを出してください。

ルール:
1. 方針、使うべきデータ構造、標準ライブラリの関数を示す。
2. コードは数行まで。
3. **太字**、`インラインコード`、# 見出し、* 箇条書き、``` コードブロックを使ってよい。
4. ヒントのみを回答する。";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds hint prompts in the configured locale.
///
/// # Example
/// ```rust
/// use code_timer::hint::{HintRequest, PromptBuilder};
///
/// let prompt = PromptBuilder::new("en").build(&HintRequest::new("Rust", "FizzBuzz", 300));
/// assert!(prompt.contains("Rust"));
/// assert!(prompt.contains("300 characters"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    locale: String,
}

impl PromptBuilder {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn build(&self, request: &HintRequest) -> String {
        let mut prompt = String::with_capacity(1024);
        prompt.push_str(self.instruction());
        prompt.push_str("\n\n");
        if self.is_japanese() {
            prompt.push_str(&format!(
                "言語: {}\n作るものの概要:\n{}\n\n約{}文字で回答してください。\n",
                request.language, request.specification, request.level
            ));
        } else {
            prompt.push_str(&format!(
                "Language: {}\nWhat they are building:\n{}\n\nAnswer in about {} characters.\n",
                request.language, request.specification, request.level
            ));
        }
        prompt
    }

    fn instruction(&self) -> &'static str {
        if self.is_japanese() {
            INSTRUCTION_JA
        } else {
            INSTRUCTION_EN
        }
    }

    fn is_japanese(&self) -> bool {
        self.locale.eq_ignore_ascii_case("ja")
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("en")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
