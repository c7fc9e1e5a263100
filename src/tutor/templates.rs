//! Canned teaching text.
//!
//! Everything here is data: per-(kind, level) explanation and analogy
//! templates, plus the five-step hint progressions. Keeping these as plain
//! tables (instead of branching code) lets tests pin individual entries and
//! keeps wording changes out of the logic.

use crate::analysis::{ErrorKind, Level};

// ─── Explanation / analogy templates ──────────────────────────────────────────

/// Teaching text for one (error kind, student level) pair.
#[derive(Debug)]
pub struct ErrorTemplate {
    pub kind: ErrorKind,
    pub level: Level,
    pub explanation: &'static str,
    pub analogy: &'static str,
}

pub static ERROR_TEMPLATES: &[ErrorTemplate] = &[
    ErrorTemplate {
        kind: ErrorKind::Syntax,
        level: Level::Basic,
        explanation: "Your code has a punctuation problem. The computer reads code far more \
                      literally than people read sentences, and one expected symbol is missing \
                      or out of place.",
        analogy: "It's like ending a question without a question mark: a person could guess \
                  what you meant, but the computer just stops and asks you to fix it.",
    },
    ErrorTemplate {
        kind: ErrorKind::Syntax,
        level: Level::Moderate,
        explanation: "A syntax error means the parser could not fit this line into the \
                      language's grammar. Usually a block marker or statement terminator is \
                      missing right where the message points.",
        analogy: "Think of a recipe where one step lost its period: the cook reads the next \
                  step as part of the current one, and everything after goes sideways.",
    },
    ErrorTemplate {
        kind: ErrorKind::Syntax,
        level: Level::Complex,
        explanation: "The parser failed at this point in the token stream: a required terminal \
                      such as ':' or ';' is absent, so everything after it is being misread. \
                      Fix the first reported site before chasing later errors.",
        analogy: "It's a grammar production with no matching terminal, like a bracket-matching \
                  machine that can never pop its stack.",
    },
    ErrorTemplate {
        kind: ErrorKind::Logic,
        level: Level::Basic,
        explanation: "The code runs, but it doesn't do what you want. The computer followed \
                      your instructions exactly, so one of the instructions must not say what \
                      you meant.",
        analogy: "It's like giving someone directions with one wrong turn: they follow them \
                  perfectly and still end up at the wrong house.",
    },
    ErrorTemplate {
        kind: ErrorKind::Logic,
        level: Level::Moderate,
        explanation: "This is a logic issue: a condition or piece of control flow doesn't match \
                      your intent. Trace the values step by step to see where reality diverges \
                      from the plan.",
        analogy: "Like a thermostat wired to turn the heater on when it's already warm: every \
                  part works, but the rule itself is backwards.",
    },
    ErrorTemplate {
        kind: ErrorKind::Logic,
        level: Level::Complex,
        explanation: "The flagged construct changes program state in a way that likely \
                      contradicts the intended invariant, for example an assignment where an \
                      equality test belongs, or a loop whose exit condition can never become \
                      true.",
        analogy: "Comparable to a control loop with an inverted feedback term: stable \
                  components, wrong sign, divergent behavior.",
    },
    ErrorTemplate {
        kind: ErrorKind::Typo,
        level: Level::Basic,
        explanation: "One word is spelled slightly wrong, so the computer doesn't recognize \
                      it. It can't guess what you meant the way a person would.",
        analogy: "It's like writing 'tacso' on a shopping list: you know it means tacos, but a \
                  very literal shopper comes home without them.",
    },
    ErrorTemplate {
        kind: ErrorKind::Typo,
        level: Level::Moderate,
        explanation: "An identifier or keyword is misspelled. The language only knows exact \
                      names, so a one-letter slip turns a familiar word into an unknown one.",
        analogy: "Like dialing a phone number with two digits swapped: close isn't enough, you \
                  reach someone else entirely.",
    },
    ErrorTemplate {
        kind: ErrorKind::Typo,
        level: Level::Complex,
        explanation: "Unresolved identifier: the token differs from a known keyword or name by \
                      a small edit distance, which almost always means a mistyped symbol \
                      rather than a missing definition.",
        analogy: "Like a checksum failing on a single flipped bit: the payload is almost \
                  right, and 'almost' is exactly what the machine rejects.",
    },
    ErrorTemplate {
        kind: ErrorKind::Structure,
        level: Level::Basic,
        explanation: "Your program is missing part of its standard skeleton, the wrapper code \
                      every program in this language starts from.",
        analogy: "It's like writing a letter without an envelope: the content is there, but \
                  the postal service needs the wrapper to deliver it.",
    },
    ErrorTemplate {
        kind: ErrorKind::Structure,
        level: Level::Moderate,
        explanation: "The program structure is incomplete: the runtime looks for a specific \
                      entry point (like main) and an enclosing declaration before it runs any \
                      of your logic.",
        analogy: "Like a play script with dialogue but no cast list or opening scene: the \
                  actors have lines and nowhere to begin.",
    },
    ErrorTemplate {
        kind: ErrorKind::Structure,
        level: Level::Complex,
        explanation: "The translation unit lacks an expected structural element. Without the \
                      conventional entry point or enclosing declaration, the toolchain has \
                      nowhere to begin execution.",
        analogy: "Like a binary with no entry symbol: the loader holds the code but has no \
                  address to jump to.",
    },
    ErrorTemplate {
        kind: ErrorKind::Style,
        level: Level::Basic,
        explanation: "The code's formatting is inconsistent, which makes it easy to misread \
                      where blocks begin and end.",
        analogy: "It's like a book where some paragraphs are indented and some aren't: you \
                  can read it, but you keep losing your place.",
    },
    ErrorTemplate {
        kind: ErrorKind::Style,
        level: Level::Moderate,
        explanation: "Inconsistent indentation: in whitespace-sensitive languages it changes \
                      meaning, and everywhere else it hides the real block structure from \
                      readers.",
        analogy: "Like sheet music where the bar lines drift: each note is right, yet every \
                  musician counts the piece differently.",
    },
    ErrorTemplate {
        kind: ErrorKind::Style,
        level: Level::Complex,
        explanation: "Mixed indentation characters produce visually identical but semantically \
                      different nesting. Normalize to a single indentation style so reviews \
                      and diffs stay trustworthy.",
        analogy: "Like a wiring cabinet labeled in two conventions at once: functional today, \
                  hazardous the first time someone else maintains it.",
    },
];

static GENERIC_TEMPLATE: ErrorTemplate = ErrorTemplate {
    kind: ErrorKind::Syntax,
    level: Level::Basic,
    explanation: "Something in your code needs a closer look. Work through it line by line \
                  with a concrete example input.",
    analogy: "Debugging is like proofreading: you read what you meant to write, so slow down \
              until you read what is actually there.",
};

/// Look up the template for `(kind, level)`, falling back to the same kind at
/// any level, then to a generic entry. The table is total, so the fallbacks
/// exist for safety rather than coverage.
pub fn template_for(kind: ErrorKind, level: Level) -> &'static ErrorTemplate {
    ERROR_TEMPLATES
        .iter()
        .find(|t| t.kind == kind && t.level == level)
        .or_else(|| ERROR_TEMPLATES.iter().find(|t| t.kind == kind))
        .unwrap_or(&GENERIC_TEMPLATE)
}

// ─── Hint progressions ────────────────────────────────────────────────────────

/// Five steps from gentle nudge to near-answer. Indexed by hint level 1..=5.
pub type HintSteps = [&'static str; 5];

pub static SYNTAX_HINTS: HintSteps = [
    "Read the flagged line out loud, symbol by symbol. Does anything feel unfinished?",
    "Compare the flagged line with a similar line that works. What's different at the end?",
    "Check the punctuation your language expects around blocks and statements.",
    "Look at the very end of the flagged line: Python block headers end with ':', C-family \
     statements end with ';'.",
    "Add the missing punctuation at the end of the flagged line, then run it again.",
];

pub static LOGIC_HINTS: HintSteps = [
    "Walk through the code by hand with one concrete example input.",
    "Write down what each variable holds after every step. Where does it stop matching your \
     expectation?",
    "Check each comparison: is it using the operator you actually meant?",
    "Look closely at the flagged condition. Is it assigning when it should compare, or can it \
     ever become false?",
    "Rewrite the flagged condition so it compares (==) instead of assigns (=), or give the \
     loop a way to stop.",
];

pub static TYPO_HINTS: HintSteps = [
    "One word in your code isn't what you think it is. Read it slowly.",
    "Compare the flagged word letter by letter with the keyword you meant.",
    "Look at the flagged word: are two letters swapped?",
    "The flagged word is misspelled. Retype it fresh instead of editing it.",
    "Replace the flagged word with the spelling suggested in the error message.",
];

pub static STRUCTURE_HINTS: HintSteps = [
    "Think about what every runnable program in this language needs before any of your own \
     logic.",
    "Where should execution start in your program? Do you have that entry point written?",
    "Check the scaffolding around your code, not the code itself.",
    "Your code is missing its standard wrapper, such as a main function or enclosing class.",
    "Wrap your logic in the language's standard entry point, then run it again.",
];

pub static STYLE_HINTS: HintSteps = [
    "Run your eye down the left edge of the code. Does the shape look regular?",
    "Check how each line is indented. Are you consistent about it?",
    "Mixing tabs and spaces confuses interpreters as well as people. Pick one.",
    "Convert all indentation to spaces (or all to tabs) so every block lines up.",
    "Re-indent the whole file with a single indentation style before running again.",
];

pub static GENERIC_HINTS: HintSteps = [
    "Explain your code out loud to an imaginary classmate, line by line.",
    "Test with the smallest input you can think of, then a slightly bigger one.",
    "Split the problem into smaller functions and test each piece on its own.",
    "Print the key values after each step and watch where they stop making sense.",
    "Comment out half the code and run it, then narrow down where behavior diverges.",
];

pub fn hint_progression(kind: ErrorKind) -> &'static HintSteps {
    match kind {
        ErrorKind::Syntax => &SYNTAX_HINTS,
        ErrorKind::Logic => &LOGIC_HINTS,
        ErrorKind::Typo => &TYPO_HINTS,
        ErrorKind::Structure => &STRUCTURE_HINTS,
        ErrorKind::Style => &STYLE_HINTS,
    }
}

/// Pick the hint for `hint_level`, clamping into the array: level 0 behaves
/// like 1, anything past the end returns the most direct hint. Never panics.
pub fn hint_for_error(kind: ErrorKind, hint_level: u8) -> &'static str {
    pick(hint_progression(kind), hint_level)
}

pub fn generic_hint(hint_level: u8) -> &'static str {
    pick(&GENERIC_HINTS, hint_level)
}

fn pick(steps: &'static HintSteps, hint_level: u8) -> &'static str {
    let idx = (hint_level.max(1) as usize - 1).min(steps.len() - 1);
    steps[idx]
}

// ─── Concept ladder ───────────────────────────────────────────────────────────

/// What to point the student at next, by class level.
pub fn next_concept(level: Level) -> &'static str {
    match level {
        Level::Basic => "loops and conditionals",
        Level::Moderate => "breaking problems into functions",
        Level::Complex => "algorithmic complexity and Big-O",
    }
}
