//! Parser for the component language.
//!
//! Parses straight from the source string with chumsky; every error is
//! reported as a positioned [`Diagnostic`].

use chumsky::prelude::*;

use crate::ast::{ComponentDef, Literal, Member, SourceUnit, Span, Spanned};
use crate::error::{CompileError, Diagnostic};

/// Parse error type
pub type ParseError<'src> = Rich<'src, char>;

type Extra<'src> = extra::Err<ParseError<'src>>;

/// Parses a whole source text.
pub fn parse(source: &str) -> Result<SourceUnit, CompileError> {
    source_unit().parse(source).into_result().map_err(|errors| {
        CompileError::new(
            errors
                .into_iter()
                .map(|e| Diagnostic::at(source, e.span().start, e.to_string()))
                .collect(),
        )
    })
}

fn span_of(span: SimpleSpan) -> Span {
    span.start..span.end
}

/// Whitespace and `//` comments
fn ws<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    let line_comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();

    choice((line_comment, text::whitespace().at_least(1).ignored()))
        .repeated()
        .ignored()
}

fn ident<'src>() -> impl Parser<'src, &'src str, Spanned<String>, Extra<'src>> + Clone {
    text::ascii::ident().map_with(|name: &str, e| Spanned::new(name.to_string(), span_of(e.span())))
}

/// Integer, real, quoted text or boolean
fn literal<'src>() -> impl Parser<'src, &'src str, Spanned<Literal>, Extra<'src>> + Clone {
    let number = just('-')
        .or_not()
        .then(text::int(10))
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .try_map(|s: &str, span| {
            if s.contains('.') {
                s.parse::<f64>()
                    .map(Literal::Real)
                    .map_err(|e| Rich::custom(span, e))
            } else {
                s.parse::<i64>()
                    .map(Literal::Int)
                    .map_err(|e| Rich::custom(span, e))
            }
        });

    let string = none_of("\"\\")
        .or(just('\\').ignore_then(any()))
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
        .map(Literal::Text);

    let boolean = choice((
        text::ascii::keyword("true").to(Literal::Bool(true)),
        text::ascii::keyword("false").to(Literal::Bool(false)),
    ));

    choice((number, string, boolean)).map_with(|lit, e| Spanned::new(lit, span_of(e.span())))
}

/// `link name[?]: Type;` or `name: kind [= literal];`
fn member<'src>() -> impl Parser<'src, &'src str, Member, Extra<'src>> + Clone {
    let link = text::ascii::keyword("link")
        .ignore_then(ws())
        .ignore_then(ident())
        .then(just('?').padded_by(ws()).or_not().map(|mark| mark.is_some()))
        .then_ignore(just(':').padded_by(ws()))
        .then(ident())
        .then_ignore(just(';').padded_by(ws()))
        .map(|((name, optional), type_name)| Member::Link {
            name,
            type_name,
            optional,
        });

    let field = ident()
        .then_ignore(just(':').padded_by(ws()))
        .then(ident())
        .then(just('=').padded_by(ws()).ignore_then(literal()).or_not())
        .then_ignore(just(';').padded_by(ws()))
        .map(|((name, kind), default)| Member::Field {
            name,
            kind,
            default,
        });

    choice((link, field))
}

/// `[pub] component Name { members }`
fn component<'src>() -> impl Parser<'src, &'src str, ComponentDef, Extra<'src>> + Clone {
    text::ascii::keyword("pub")
        .then_ignore(ws())
        .or_not()
        .map(|public| public.is_some())
        .then_ignore(text::ascii::keyword("component"))
        .then_ignore(ws())
        .then(ident())
        .then(
            member()
                .padded_by(ws())
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just('{').padded_by(ws()), just('}')),
        )
        .map(|((public, name), members)| ComponentDef {
            public,
            name,
            members,
        })
}

fn source_unit<'src>() -> impl Parser<'src, &'src str, SourceUnit, Extra<'src>> {
    ws().ignore_then(
        component()
            .padded_by(ws())
            .repeated()
            .collect::<Vec<_>>(),
    )
    .then_ignore(end())
    .map(|components| SourceUnit { components })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        // wheat management
        pub component Script {
            x: real = 1;
            label: text = "wheat";
            sown: bool;
            count: int = -3;
            link clock: Clock;
            link weather?: Weather;
        }

        component Helper {
            depth: real = 0.25;
        }
    "#;

    #[test]
    fn test_parse_sample() {
        let unit = parse(SAMPLE).unwrap();
        assert_eq!(unit.components.len(), 2);

        let script = &unit.components[0];
        assert!(script.public);
        assert_eq!(script.name.node, "Script");
        assert_eq!(script.members.len(), 6);
        assert!(!unit.components[1].public);

        match &script.members[0] {
            Member::Field { name, kind, default } => {
                assert_eq!(name.node, "x");
                assert_eq!(kind.node, "real");
                assert_eq!(default.as_ref().map(|d| &d.node), Some(&Literal::Int(1)));
            }
            other => panic!("unexpected member {other:?}"),
        }
        match &script.members[5] {
            Member::Link {
                name,
                type_name,
                optional,
            } => {
                assert_eq!(name.node, "weather");
                assert_eq!(type_name.node, "Weather");
                assert!(*optional);
            }
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn test_literals() {
        let unit = parse(
            "component A { a: real = -2.5; b: text = \"q\\\"t\"; c: bool = false; d: int = 0; }",
        )
        .unwrap();
        let defaults: Vec<_> = unit.components[0]
            .members
            .iter()
            .map(|m| match m {
                Member::Field { default, .. } => default.as_ref().map(|d| d.node.clone()),
                Member::Link { .. } => None,
            })
            .collect();
        assert_eq!(
            defaults,
            vec![
                Some(Literal::Real(-2.5)),
                Some(Literal::Text("q\"t".into())),
                Some(Literal::Bool(false)),
                Some(Literal::Int(0)),
            ]
        );
    }

    #[test]
    fn test_field_named_like_keyword_prefix() {
        let unit = parse("component A { linked: real; }").unwrap();
        assert!(matches!(
            unit.components[0].members[0],
            Member::Field { ref name, .. } if name.node == "linked"
        ));
    }

    #[test]
    fn test_empty_source_has_no_components() {
        assert!(parse("  // nothing here\n").unwrap().components.is_empty());
    }

    #[test]
    fn test_syntax_error_is_positioned() {
        let err = parse("pub component Script {\n    x: real = ;\n}").unwrap_err();
        assert!(!err.diagnostics.is_empty());
        assert_eq!(err.diagnostics[0].line, 2);
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let err = parse("component A { n: int = 99999999999999999999; }").unwrap_err();
        assert_eq!(err.diagnostics[0].line, 1);
        assert!(err.diagnostics[0].column > 20);
    }
}
