//! Word lists. All entries are lowercase; lookups lowercase the identifier first.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordClass {
    Keyword,
    Operator,
    Constant,
    Builtin,
}

const KEYWORDS: &[&str] = &[
    "as", "byref", "byval", "call", "case", "class", "const", "default", "dim", "do", "each",
    "else", "elseif", "end", "erase", "error", "exit", "explicit", "for", "friend", "function",
    "get", "global", "goto", "if", "implements", "in", "inherits", "let", "loop", "module", "new",
    "next", "on", "option", "optional", "preserve", "private", "property", "public", "randomize",
    "redim", "resume", "return", "select", "set", "shared", "static", "step", "stop", "sub", "then",
    "to", "until", "wend", "while", "with",
];

const WORD_OPERATORS: &[&str] = &[
    "and", "andalso", "eqv", "imp", "is", "like", "mod", "not", "or", "orelse", "xor",
];

const CONSTANTS: &[&str] = &[
    "empty", "false", "nothing", "null", "true",
    // string constants
    "vbcr", "vbcrlf", "vbformfeed", "vblf", "vbnewline", "vbnullchar", "vbnullstring", "vbtab",
    "vbverticaltab",
    // MsgBox buttons and results
    "vbabort", "vbabortretryignore", "vbapplicationmodal", "vbcancel", "vbcritical",
    "vbdefaultbutton1", "vbdefaultbutton2", "vbdefaultbutton3", "vbexclamation", "vbignore",
    "vbinformation", "vbno", "vbok", "vbokcancel", "vbokonly", "vbquestion", "vbretry",
    "vbretrycancel", "vbsystemmodal", "vbyes", "vbyesno", "vbyesnocancel",
    // comparison, tristate, VarType
    "vbbinarycompare", "vbtextcompare", "vbfalse", "vbtrue", "vbusedefault", "vbarray",
    "vbboolean", "vbbyte", "vbcurrency", "vbdataobject", "vbdate", "vbdecimal", "vbdouble",
    "vbempty", "vberror", "vbinteger", "vblong", "vbnull", "vbobject", "vbsingle", "vbstring",
    "vbvariant",
    // dates
    "vbsunday", "vbmonday", "vbtuesday", "vbwednesday", "vbthursday", "vbfriday", "vbsaturday",
    "vbfirstjan1", "vbfirstfourdays", "vbfirstfullweek", "vbusesystem",
    "vbusesystemdayofweek", "vbgeneraldate", "vblongdate", "vbshortdate", "vblongtime",
    "vbshorttime",
    // colors
    "vbblack", "vbblue", "vbcyan", "vbgreen", "vbmagenta", "vbred", "vbwhite", "vbyellow",
    "vbobjecterror",
];

const BUILTINS: &[&str] = &[
    // interaction
    "createobject", "getobject", "inputbox", "msgbox", "eval", "execute", "executeglobal",
    "getref", "scriptengine", "wscript", "err",
    // conversion
    "asc", "ascb", "ascw", "cbool", "cbyte", "ccur", "cdate", "cdbl", "chr", "chrb", "chrw",
    "cint", "clng", "csng", "cstr", "hex", "oct",
    // strings
    "escape", "filter", "formatcurrency", "formatdatetime", "formatnumber", "formatpercent",
    "instr", "instrb", "instrrev", "join", "lcase", "left", "leftb", "len", "lenb", "ltrim",
    "mid", "midb", "replace", "right", "rightb", "rtrim", "space", "split", "strcomp", "string",
    "strreverse", "trim", "ucase", "unescape",
    // math
    "abs", "atn", "cos", "exp", "fix", "int", "log", "rnd", "round", "sgn", "sin", "sqr", "tan",
    // dates
    "date", "dateadd", "datediff", "datepart", "dateserial", "datevalue", "day", "hour",
    "minute", "month", "monthname", "now", "second", "time", "timer", "timeserial", "timevalue",
    "weekday", "weekdayname", "year",
    // arrays and types
    "array", "isarray", "isdate", "isempty", "isnull", "isnumeric", "isobject", "lbound",
    "typename", "ubound", "vartype", "rgb",
];

/// Build the lookup table.
pub(crate) fn table() -> HashMap<String, WordClass> {
    let lists = [
        (WordClass::Builtin, BUILTINS),
        (WordClass::Constant, CONSTANTS),
        (WordClass::Operator, WORD_OPERATORS),
        (WordClass::Keyword, KEYWORDS),
    ];

    let mut table = HashMap::new();
    // Later lists win: `Randomize` is a statement keyword before it is a builtin.
    for (class, words) in lists {
        for word in words {
            table.insert((*word).to_string(), class);
        }
    }
    table
}
