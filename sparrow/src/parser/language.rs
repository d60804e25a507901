// Copyright (C) 2023 - 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{BinaryOperator, Lexer, Node, Token};

use super::{
    error::{ParseError, ParseResult},
    Build, Builder, Fragment, Grammar, Leaf, Marker, OperatorTable, ProductionId, Rule, TokenStream,
};

pub const RESERVED_WORDS: [&str; 13] = [
    "if", "elif", "else", "while", "return", "def", "class", "extends", "lamb", "use", "and", "or", "new",
];

/// The Sparrow grammar, wired once and reusable for any number of programs.
///
/// ```text
/// param      : IDENTIFIER
/// params     : param {"," param} | NULL
/// param_list : "(" params ")"
/// elements   : expr {"," expr}
/// primary    : "lamb" param_list block
///            | ( "[" [elements] "]" | "(" expr ")" | INT | FLOAT | IDENTIFIER | STRING ) {postfix}
/// factor     : "-" primary | primary
/// expr       : factor { OP factor }
/// block      : "{" [statement] {(";" | EOL) [statement]} "}"
/// def        : "def" IDENTIFIER param_list block
/// args       : expr {"," expr} | NULL
/// postfix    : "." "new" "(" args ")" | "." IDENTIFIER | "(" args ")" | "[" expr "]"
/// simple     : expr
/// use        : "use" IDENTIFIER "=" IDENTIFIER
/// statement  : "if" condition block {elif} ["else" block]
///            | "while" condition block
///            | "return" expr
///            | simple
/// elif       : "elif" condition block
/// condition  : and_logic | or_logic | expr
/// and_logic  : "and" "(" condition "," condition ")"
/// or_logic   : "or" "(" condition "," condition ")"
/// member     : def | simple
/// class_body : "{" [member] {(";" | EOL) [member]} "}"
/// def_class  : "class" IDENTIFIER ["extends" IDENTIFIER] class_body
/// program    : [def_class | def | use | statement] (";" | EOL)
/// ```
pub struct Parser {
    grammar: Grammar,
    program: ProductionId,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        let mut grammar = Grammar::new(RESERVED_WORDS);

        let expr = grammar.define("expression");
        let statement = grammar.define("statement");
        let block = grammar.define("block");
        let condition = grammar.define("condition");

        let param_list = grammar.add("parameter_list", Rule::sequence(Build::Mark(Marker::Parameters), [
            Rule::keyword("("),
            Rule::optional(comma_separated(Rule::name())),
            Rule::keyword(")"),
        ]));

        let postfix = grammar.add("postfix", Rule::choice([
            Rule::sequence(Build::Mark(Marker::New), [
                Rule::keyword("."),
                Rule::keyword("new"),
                Rule::keyword("("),
                Rule::optional(comma_separated(expr.into())),
                Rule::keyword(")"),
            ]),
            Rule::sequence(Build::Mark(Marker::Member), [
                Rule::keyword("."),
                Rule::name(),
            ]),
            Rule::sequence(Build::Mark(Marker::Call), [
                Rule::keyword("("),
                Rule::optional(comma_separated(expr.into())),
                Rule::keyword(")"),
            ]),
            Rule::sequence(Build::Mark(Marker::Index), [
                Rule::keyword("["),
                expr.into(),
                Rule::keyword("]"),
            ]),
        ]));

        let atom = Rule::choice([
            Rule::sequence(Build::Node(Builder::Array), [
                Rule::keyword("["),
                Rule::optional(comma_separated(expr.into())),
                Rule::keyword("]"),
            ]),
            Rule::sequence(Build::Flatten, [
                Rule::keyword("("),
                expr.into(),
                Rule::keyword(")"),
            ]),
            Rule::Token(Leaf::Integer),
            Rule::Token(Leaf::Float),
            Rule::Token(Leaf::Reference),
            Rule::Token(Leaf::String),
        ]);

        let primary = grammar.add("primary", Rule::choice([
            Rule::sequence(Build::Node(Builder::Lambda), [
                Rule::keyword("lamb"),
                param_list.into(),
                block.into(),
            ]),
            Rule::sequence(Build::Node(Builder::Postfix), [
                atom,
                Rule::repeat(postfix.into()),
            ]),
        ]));

        let factor = grammar.add("factor", Rule::choice([
            Rule::sequence(Build::Node(Builder::Negate), [
                Rule::keyword("-"),
                primary.into(),
            ]),
            primary.into(),
        ]));

        grammar.set(expr, Rule::expression(factor.into(), operator_table()));

        grammar.set(block, Rule::sequence(Build::Node(Builder::Block), [
            Rule::keyword("{"),
            Rule::optional(statement.into()),
            Rule::repeat(Rule::sequence(Build::Flatten, [
                separator(),
                Rule::optional(statement.into()),
            ])),
            Rule::keyword("}"),
        ]));

        let def = grammar.add("function_definition", Rule::sequence(Build::Node(Builder::FunctionDef), [
            Rule::keyword("def"),
            Rule::name(),
            param_list.into(),
            block.into(),
        ]));

        let simple = grammar.add("simple_statement", expr.into());

        let use_statement = grammar.add("use_statement", Rule::sequence(Build::Node(Builder::Use), [
            Rule::keyword("use"),
            Rule::name(),
            Rule::keyword("="),
            Rule::name(),
        ]));

        grammar.set(condition, Rule::choice([
            Rule::sequence(Build::Node(Builder::And), [
                Rule::keyword("and"),
                Rule::keyword("("),
                condition.into(),
                Rule::keyword(","),
                condition.into(),
                Rule::keyword(")"),
            ]),
            Rule::sequence(Build::Node(Builder::Or), [
                Rule::keyword("or"),
                Rule::keyword("("),
                condition.into(),
                Rule::keyword(","),
                condition.into(),
                Rule::keyword(")"),
            ]),
            expr.into(),
        ]));

        grammar.set(statement, Rule::choice([
            Rule::sequence(Build::Node(Builder::If), [
                Rule::keyword("if"),
                condition.into(),
                block.into(),
                Rule::repeat(Rule::sequence(Build::Mark(Marker::Elif), [
                    Rule::keyword("elif"),
                    condition.into(),
                    block.into(),
                ])),
                Rule::optional(Rule::sequence(Build::Mark(Marker::Else), [
                    Rule::keyword("else"),
                    block.into(),
                ])),
            ]),
            Rule::sequence(Build::Node(Builder::While), [
                Rule::keyword("while"),
                condition.into(),
                block.into(),
            ]),
            Rule::sequence(Build::Node(Builder::Return), [
                Rule::keyword("return"),
                expr.into(),
            ]),
            simple.into(),
        ]));

        let member = Rule::choice([def.into(), simple.into()]);
        let class_body = Rule::sequence(Build::Mark(Marker::ClassBody), [
            Rule::keyword("{"),
            Rule::optional(member.clone()),
            Rule::repeat(Rule::sequence(Build::Flatten, [
                separator(),
                Rule::optional(member),
            ])),
            Rule::keyword("}"),
        ]);

        let def_class = grammar.add("class_definition", Rule::sequence(Build::Node(Builder::ClassDef), [
            Rule::keyword("class"),
            Rule::name(),
            Rule::optional(Rule::sequence(Build::Mark(Marker::Extends), [
                Rule::keyword("extends"),
                Rule::name(),
            ])),
            class_body,
        ]));

        let program = grammar.add("program", Rule::sequence(Build::Flatten, [
            Rule::optional(Rule::choice([
                def_class.into(),
                def.into(),
                use_statement.into(),
                statement.into(),
            ])),
            separator(),
        ]));

        Self {
            grammar,
            program,
        }
    }

    /// Parses everything the lexer produces up to the end of its input.
    pub fn parse(&self, lexer: &mut Lexer) -> ParseResult<Node> {
        let mut tokens = TokenStream::new(lexer);
        let mut statements = Vec::new();

        log::debug!("Parsing {:?}", tokens.file_name());

        while !tokens.peek(0).is_end_of_file() {
            let before = tokens.consumed();
            let fragments = match self.grammar.parse(self.program, &mut tokens) {
                Ok(fragments) => fragments,
                Err(ParseError::UnexpectedToken { .. }) if tokens.consumed() == before => {
                    return Err(self.grammar.unexpected_start(self.program, &mut tokens));
                }
                Err(e) => return Err(e),
            };

            for fragment in fragments {
                let Fragment::Node(node) = fragment else {
                    return Err(ParseError::MalformedRule { rule: "program" });
                };

                statements.push(node);
            }
        }

        log::debug!("Parsed {} top-level statements", statements.len());
        Ok(Node::Program(statements))
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn operator_table() -> OperatorTable {
    use BinaryOperator::*;

    OperatorTable::new()
        .with(1, &[Assign])
        .with(2, &[Or])
        .with(3, &[And])
        .with(4, &[Equal, NotEqual])
        .with(5, &[Less, Greater, LessOrEqual, GreaterOrEqual])
        .with(6, &[Add, Subtract])
        .with(7, &[Multiply, Divide, Modulo])
}

fn separator() -> Rule {
    Rule::choice([Rule::keyword(";"), Rule::keyword(Token::END_OF_LINE)])
}

/// `rule {"," rule}`
fn comma_separated(rule: Rule) -> Rule {
    Rule::sequence(Build::Flatten, [
        rule.clone(),
        Rule::repeat(Rule::sequence(Build::Flatten, [Rule::keyword(","), rule])),
    ])
}
