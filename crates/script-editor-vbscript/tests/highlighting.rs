use pretty_assertions::assert_eq;
use script_editor_core::{
    EditKind, EditorSession, Position, RecordingSink, StyleMarker, TextRange, TokenCategory,
};
use script_editor_vbscript::{VbScriptGrammar, tokenizer};
use std::time::{Duration, Instant};

const SAMPLE: &str = r#"' Sample script
' Edit freely

Sub Main()
    Dim x As Integer
    Dim nombre As String

    x = &H0A
    nombre = "Mundo"

    If x > 5 Then
        MsgBox "Hola " & nombre
    Else
        MsgBox "El valor es menor"
    End If

    Call MiFuncion(x)
End Sub

Function MiFuncion(valor)
    Dim resultado
    resultado = valor * 2
    MiFuncion = resultado
End Function
"#;

fn words_of(category: TokenCategory) -> Vec<String> {
    tokenizer()
        .unwrap()
        .tokenize(SAMPLE)
        .into_iter()
        .filter(|t| t.category == category)
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_tokens_cover_sample_exactly() {
    let tokens = tokenizer().unwrap().tokenize(SAMPLE);
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, SAMPLE);
    assert!(tokens.iter().all(|t| t.len > 0));
    assert_eq!(
        tokens.iter().map(|t| t.len).sum::<usize>(),
        SAMPLE.chars().count()
    );
}

#[test]
fn test_sample_categories() {
    assert_eq!(
        words_of(TokenCategory::Comment),
        vec!["' Sample script", "' Edit freely"]
    );
    assert_eq!(
        words_of(TokenCategory::Function),
        vec!["Main", "MiFuncion", "MiFuncion"]
    );
    assert_eq!(words_of(TokenCategory::ClassName), vec!["Integer", "String"]);
    assert_eq!(words_of(TokenCategory::Builtin), vec!["MsgBox", "MsgBox"]);
    assert_eq!(words_of(TokenCategory::Number), vec!["&H0A", "5", "2"]);
    assert_eq!(
        words_of(TokenCategory::String),
        vec!["\"Mundo\"", "\"Hola \"", "\"El valor es menor\""]
    );
    assert!(words_of(TokenCategory::Variable).contains(&"resultado".to_string()));
    assert!(words_of(TokenCategory::Keyword).contains(&"Then".to_string()));
}

#[test]
fn test_session_highlights_sample() {
    let mut session = EditorSession::new(VbScriptGrammar::new().unwrap(), RecordingSink::new());
    session.load_content(SAMPLE).unwrap();

    let comments = session
        .sink()
        .ranges(StyleMarker::Category(TokenCategory::Comment));
    assert_eq!(
        comments,
        vec![
            TextRange::new(Position::new(1, 0), Position::new(1, 15)).unwrap(),
            TextRange::new(Position::new(2, 0), Position::new(2, 13)).unwrap(),
        ]
    );
    assert_eq!(session.overlay().generation(), 1);
}

#[test]
fn test_typing_a_quote_rehighlights_after_short_delay() {
    let mut session = EditorSession::new(VbScriptGrammar::new().unwrap(), RecordingSink::new());
    session.load_content("x = 1\n").unwrap();

    let t0 = Instant::now();
    session
        .insert(Position::new(1, 4), "\"", EditKind::Insert('"'), t0)
        .unwrap();
    assert!(!session.poll(t0 + Duration::from_millis(10)).unwrap());
    assert!(session.poll(t0 + Duration::from_millis(20)).unwrap());

    // The unterminated string now swallows the rest of the line.
    assert_eq!(
        session
            .sink()
            .ranges(StyleMarker::Category(TokenCategory::String)),
        vec![TextRange::new(Position::new(1, 4), Position::new(1, 6)).unwrap()]
    );
    assert!(
        session
            .sink()
            .ranges(StyleMarker::Category(TokenCategory::Number))
            .is_empty()
    );
}

#[test]
fn test_search_is_case_insensitive_over_code() {
    let mut session = EditorSession::new(VbScriptGrammar::new().unwrap(), RecordingSink::new());
    session.load_content(SAMPLE).unwrap();

    assert_eq!(session.set_query("msgbox").unwrap(), 2);
    assert_eq!(session.search().summary().to_string(), "1/2");
    let second = session.find_next().unwrap().unwrap();
    assert_eq!(second.range.start, Position::new(14, 8));
}
