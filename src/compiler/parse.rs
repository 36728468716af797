use crate::common::span::{Span, Spanned};
use crate::common::tree::{Label, Tree};
use crate::compiler::syntax::Syntax;
use crate::compiler::token::{Token, Tokens};

/// Parses a token stream into a syntax tree,
/// checking that the whole stream is consumed.
pub fn parse(tokens: Tokens) -> Result<Tree, Syntax> {
    let mut parser = Parser::new(tokens);
    let tree = parser.e()?;
    parser.expect_end()?;
    Ok(tree)
}

/// A recursive-descent parser over the RPAL grammar.
/// One method per nonterminal; each returns the subtree it built.
#[derive(Debug)]
pub struct Parser {
    tokens: Tokens,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Tokens) -> Parser {
        Parser { tokens, index: 0 }
    }

    // helpers

    fn current(&self) -> &Spanned<Token> {
        // the lexer always terminates the stream with `End`
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        match self.tokens.get(self.index + 1) {
            Some(next) => &next.item,
            None => &Token::End,
        }
    }

    fn advance(&mut self) -> Spanned<Token> {
        let token = self.current().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn at_keyword(&self, word: &str) -> bool {
        matches!(&self.current().item, Token::Keyword(k) if k == word)
    }

    fn at_op(&self, op: &str) -> bool {
        matches!(&self.current().item, Token::Op(o) if o == op)
    }

    fn at_punct(&self, p: char) -> bool {
        matches!(&self.current().item, Token::Punct(c) if *c == p)
    }

    fn expected(&self, what: &str) -> Syntax {
        let current = self.current();
        Syntax::error(
            &format!("expected {}, found {}", what, current.item),
            &current.span,
        )
    }

    fn consume_keyword(&mut self, word: &str) -> Result<Span, Syntax> {
        if self.at_keyword(word) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(&format!("keyword `{}`", word)))
        }
    }

    fn consume_op(&mut self, op: &str) -> Result<Span, Syntax> {
        if self.at_op(op) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(&format!("`{}`", op)))
        }
    }

    fn consume_punct(&mut self, p: char) -> Result<Span, Syntax> {
        if self.at_punct(p) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(&format!("`{}`", p)))
        }
    }

    fn identifier(&mut self) -> Result<Tree, Syntax> {
        match &self.current().item {
            Token::Iden(_) => {
                let Spanned { item, span } = self.advance();
                match item {
                    Token::Iden(name) => Ok(Tree::leaf(Label::Id(name), span)),
                    _ => unreachable!(),
                }
            },
            _ => Err(self.expected("an identifier")),
        }
    }

    fn expect_end(&self) -> Result<(), Syntax> {
        match &self.current().item {
            Token::End => Ok(()),
            _ => Err(self.expected("the end of the program")),
        }
    }

    // expressions

    /// `E -> let D in E | fn Vb+ . E | Ew`
    pub fn e(&mut self) -> Result<Tree, Syntax> {
        if self.at_keyword("let") {
            self.consume_keyword("let")?;
            let definition = self.d()?;
            self.consume_keyword("in")?;
            let body = self.e()?;
            Ok(Tree::branch(Label::Let, vec![definition, body]))
        } else if self.at_keyword("fn") {
            self.consume_keyword("fn")?;
            let mut children = vec![self.vb()?];
            while self.at_vb() {
                children.push(self.vb()?);
            }
            self.consume_op(".")?;
            children.push(self.e()?);
            Ok(Tree::branch(Label::Lambda, children))
        } else {
            self.ew()
        }
    }

    /// `Ew -> T (where Dr)?`
    fn ew(&mut self) -> Result<Tree, Syntax> {
        let body = self.t()?;

        if self.at_keyword("where") {
            self.consume_keyword("where")?;
            let definition = self.dr()?;
            return Ok(Tree::branch(Label::Where, vec![body, definition]));
        }

        Ok(body)
    }

    /// `T -> Ta (, Ta)*`, two or more forming a `tau`.
    fn t(&mut self) -> Result<Tree, Syntax> {
        let mut elements = vec![self.ta()?];

        while self.at_punct(',') {
            self.consume_punct(',')?;
            elements.push(self.ta()?);
        }

        if elements.len() > 1 {
            Ok(Tree::branch(Label::Tau, elements))
        } else {
            Ok(elements.remove(0))
        }
    }

    /// `Ta -> Tc (aug Tc)*`, left-associative.
    fn ta(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.tc()?;

        while self.at_keyword("aug") {
            self.consume_keyword("aug")?;
            let right = self.tc()?;
            left = Tree::branch(Label::Aug, vec![left, right]);
        }

        Ok(left)
    }

    /// `Tc -> B (-> Tc | Tc)?`, the three-armed conditional.
    fn tc(&mut self) -> Result<Tree, Syntax> {
        let condition = self.b()?;

        if self.at_op("->") {
            self.consume_op("->")?;
            let then = self.tc()?;
            self.consume_op("|")?;
            let other = self.tc()?;
            return Ok(Tree::branch(Label::Cond, vec![condition, then, other]));
        }

        Ok(condition)
    }

    /// `B -> Bt (or Bt)*`, left-associative.
    fn b(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.bt()?;

        while self.at_keyword("or") {
            self.consume_keyword("or")?;
            let right = self.bt()?;
            left = Tree::branch(Label::Or, vec![left, right]);
        }

        Ok(left)
    }

    /// `Bt -> Bs (& Bs)*`, left-associative.
    fn bt(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.bs()?;

        while self.at_op("&") {
            self.consume_op("&")?;
            let right = self.bs()?;
            left = Tree::branch(Label::Amp, vec![left, right]);
        }

        Ok(left)
    }

    /// `Bs -> not Bp | Bp`
    fn bs(&mut self) -> Result<Tree, Syntax> {
        if self.at_keyword("not") {
            self.consume_keyword("not")?;
            let operand = self.bp()?;
            return Ok(Tree::branch(Label::Not, vec![operand]));
        }

        self.bp()
    }

    /// `Bp -> A (relop A)?` where a relop is one of the keywords
    /// `gr ge ls le eq ne` or a symbol spelling `> >= < <=`.
    fn bp(&mut self) -> Result<Tree, Syntax> {
        let left = self.a()?;

        let relop = match &self.current().item {
            Token::Keyword(word) => match word.as_str() {
                "gr" => Some(Label::Gr),
                "ge" => Some(Label::Ge),
                "ls" => Some(Label::Ls),
                "le" => Some(Label::Le),
                "eq" => Some(Label::Eq),
                "ne" => Some(Label::Ne),
                _ => None,
            },
            Token::Op(op) => match op.as_str() {
                ">" => Some(Label::Gr),
                ">=" => Some(Label::Ge),
                "<" => Some(Label::Ls),
                "<=" => Some(Label::Le),
                _ => None,
            },
            _ => None,
        };

        if let Some(label) = relop {
            self.advance();
            let right = self.a()?;
            return Ok(Tree::branch(label, vec![left, right]));
        }

        Ok(left)
    }

    /// `A -> (+|-)? At ((+|-) At)*`; unary `-` becomes `neg`.
    fn a(&mut self) -> Result<Tree, Syntax> {
        let mut left = if self.at_op("+") {
            self.consume_op("+")?;
            self.at()?
        } else if self.at_op("-") {
            self.consume_op("-")?;
            let operand = self.at()?;
            Tree::branch(Label::Neg, vec![operand])
        } else {
            self.at()?
        };

        loop {
            let label = if self.at_op("+") {
                Label::Add
            } else if self.at_op("-") {
                Label::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.at()?;
            left = Tree::branch(label, vec![left, right]);
        }

        Ok(left)
    }

    /// `At -> Af ((*|/) Af)*`, left-associative.
    fn at(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.af()?;

        loop {
            let label = if self.at_op("*") {
                Label::Mul
            } else if self.at_op("/") {
                Label::Div
            } else {
                break;
            };
            self.advance();
            let right = self.af()?;
            left = Tree::branch(label, vec![left, right]);
        }

        Ok(left)
    }

    /// `Af -> Ap (** Af)?`, right-associative.
    fn af(&mut self) -> Result<Tree, Syntax> {
        let base = self.ap()?;

        if self.at_op("**") {
            self.consume_op("**")?;
            let exponent = self.af()?;
            return Ok(Tree::branch(Label::Pow, vec![base, exponent]));
        }

        Ok(base)
    }

    /// `Ap -> R (@ <id> R)*`, user-defined infix, left-associative.
    fn ap(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.r()?;

        while self.at_op("@") {
            self.consume_op("@")?;
            let infix = self.identifier()?;
            let right = self.r()?;
            left = Tree::branch(Label::At, vec![left, infix, right]);
        }

        Ok(left)
    }

    /// `R -> Rn+`, application by juxtaposition, left-associative.
    fn r(&mut self) -> Result<Tree, Syntax> {
        let mut left = self.rn()?;

        while self.at_rn() {
            let argument = self.rn()?;
            left = Tree::branch(Label::Gamma, vec![left, argument]);
        }

        Ok(left)
    }

    fn at_rn(&self) -> bool {
        match &self.current().item {
            Token::Iden(_) | Token::Int(_) | Token::Str(_) => true,
            Token::Punct('(') => true,
            Token::Keyword(word) => matches!(word.as_str(), "true" | "false" | "nil" | "dummy"),
            _ => false,
        }
    }

    /// `Rn -> ( E ) | <id> | <int> | <str> | true | false | nil | dummy`
    fn rn(&mut self) -> Result<Tree, Syntax> {
        match &self.current().item {
            Token::Punct('(') => {
                self.consume_punct('(')?;
                let inner = self.e()?;
                self.consume_punct(')')?;
                Ok(inner)
            },
            Token::Iden(_) => self.identifier(),
            Token::Int(_) => {
                let Spanned { item, span } = self.advance();
                match item {
                    Token::Int(value) => Ok(Tree::leaf(Label::Int(value), span)),
                    _ => unreachable!(),
                }
            },
            Token::Str(_) => {
                let Spanned { item, span } = self.advance();
                match item {
                    Token::Str(body) => Ok(Tree::leaf(Label::Str(body), span)),
                    _ => unreachable!(),
                }
            },
            Token::Keyword(word) => {
                let label = match word.as_str() {
                    "true" => Label::True,
                    "false" => Label::False,
                    "nil" => Label::Nil,
                    "dummy" => Label::Dummy,
                    _ => return Err(self.expected("an expression")),
                };
                let span = self.advance().span;
                Ok(Tree::leaf(label, span))
            },
            _ => Err(self.expected("an expression")),
        }
    }

    // definitions

    /// `D -> Da (within D)?`
    fn d(&mut self) -> Result<Tree, Syntax> {
        let outer = self.da()?;

        if self.at_keyword("within") {
            self.consume_keyword("within")?;
            let inner = self.d()?;
            return Ok(Tree::branch(Label::Within, vec![outer, inner]));
        }

        Ok(outer)
    }

    /// `Da -> Dr (and Dr)*`, two or more forming a simultaneous `and`.
    fn da(&mut self) -> Result<Tree, Syntax> {
        let mut definitions = vec![self.dr()?];

        while self.at_keyword("and") {
            self.consume_keyword("and")?;
            definitions.push(self.dr()?);
        }

        if definitions.len() > 1 {
            Ok(Tree::branch(Label::And, definitions))
        } else {
            Ok(definitions.remove(0))
        }
    }

    /// `Dr -> rec Db | Db`
    fn dr(&mut self) -> Result<Tree, Syntax> {
        if self.at_keyword("rec") {
            self.consume_keyword("rec")?;
            let definition = self.db()?;
            return Ok(Tree::branch(Label::Rec, vec![definition]));
        }

        self.db()
    }

    /// `Db -> ( D ) | <id> Vb+ = E | Vl = E`
    fn db(&mut self) -> Result<Tree, Syntax> {
        if self.at_punct('(') {
            self.consume_punct('(')?;
            let definition = self.d()?;
            self.consume_punct(')')?;
            return Ok(definition);
        }

        // an identifier followed by a binding is a function form;
        // otherwise fall through to the plain `Vl = E` definition
        let function_form = matches!(&self.current().item, Token::Iden(_))
            && matches!(self.peek_next(), Token::Iden(_) | Token::Punct('('));

        if function_form {
            let mut children = vec![self.identifier()?];
            while self.at_vb() {
                children.push(self.vb()?);
            }
            self.consume_op("=")?;
            children.push(self.e()?);
            return Ok(Tree::branch(Label::FunctionForm, children));
        }

        let names = self.vl()?;
        self.consume_op("=")?;
        let value = self.e()?;
        Ok(Tree::branch(Label::Bind, vec![names, value]))
    }

    fn at_vb(&self) -> bool {
        matches!(&self.current().item, Token::Iden(_) | Token::Punct('('))
    }

    /// `Vb -> <id> | ( ) | ( Vl )`
    fn vb(&mut self) -> Result<Tree, Syntax> {
        if self.at_punct('(') {
            let open = self.consume_punct('(')?;

            if self.at_punct(')') {
                let close = self.consume_punct(')')?;
                return Ok(Tree::leaf(Label::Empty, Span::combine(&open, &close)));
            }

            let names = self.vl()?;
            self.consume_punct(')')?;
            return Ok(names);
        }

        self.identifier()
    }

    /// `Vl -> <id> (, <id>)*`, two or more forming a `,` list.
    fn vl(&mut self) -> Result<Tree, Syntax> {
        let mut names = vec![self.identifier()?];

        while self.at_punct(',') {
            self.consume_punct(',')?;
            names.push(self.identifier()?);
        }

        if names.len() > 1 {
            Ok(Tree::branch(Label::Comma, names))
        } else {
            Ok(names.remove(0))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;

    fn parsed(source: &str) -> String {
        parse(Lexer::lex(Source::source(source)).unwrap())
            .unwrap()
            .dump()
    }

    #[test]
    fn let_binding() {
        assert_eq!(parsed("let X = 42 in X"), "let\n.=\n..<ID:X>\n..<INT:42>\n.<ID:X>\n");
    }

    #[test]
    fn application_is_left_associative() {
        assert_eq!(
            parsed("f x y"),
            "gamma\n.gamma\n..<ID:f>\n..<ID:x>\n.<ID:y>\n"
        );
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(
            parsed("1 + 2 * 3"),
            "+\n.<INT:1>\n.*\n..<INT:2>\n..<INT:3>\n"
        );
    }

    #[test]
    fn unary_minus_then_sum() {
        assert_eq!(
            parsed("-1 + 2"),
            "+\n.neg\n..<INT:1>\n.<INT:2>\n"
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            parsed("2 ** 3 ** 4"),
            "**\n.<INT:2>\n.**\n..<INT:3>\n..<INT:4>\n"
        );
    }

    #[test]
    fn relop_symbol_spelling() {
        assert_eq!(parsed("1 < 2"), "ls\n.<INT:1>\n.<INT:2>\n");
        assert_eq!(parsed("1 ge 2"), "ge\n.<INT:1>\n.<INT:2>\n");
    }

    #[test]
    fn conditional() {
        assert_eq!(
            parsed("true -> 1 | 2"),
            "->\n.true\n.<INT:1>\n.<INT:2>\n"
        );
    }

    #[test]
    fn tuple_and_aug() {
        assert_eq!(parsed("1, 2, 3"), "tau\n.<INT:1>\n.<INT:2>\n.<INT:3>\n");
        assert_eq!(parsed("nil aug 1"), "aug\n.<nil>\n.<INT:1>\n");
    }

    #[test]
    fn lambda_with_several_binders() {
        assert_eq!(
            parsed("fn x y . x"),
            "lambda\n.<ID:x>\n.<ID:y>\n.<ID:x>\n"
        );
    }

    #[test]
    fn empty_parameter_list() {
        assert_eq!(parsed("fn () . 1"), "lambda\n.()\n.<INT:1>\n");
    }

    #[test]
    fn function_form() {
        assert_eq!(
            parsed("let Add x y = x + y in Add"),
            "let\n.function_form\n..<ID:Add>\n..<ID:x>\n..<ID:y>\n..+\n...<ID:x>\n...<ID:y>\n.<ID:Add>\n"
        );
    }

    #[test]
    fn tuple_parameter() {
        assert_eq!(
            parsed("let Pair (x, y) = x in Pair"),
            "let\n.function_form\n..<ID:Pair>\n..,\n...<ID:x>\n...<ID:y>\n..<ID:x>\n.<ID:Pair>\n"
        );
    }

    #[test]
    fn rec_and_where() {
        assert_eq!(
            parsed("X where rec X = 1"),
            "where\n.<ID:X>\n.rec\n..=\n...<ID:X>\n...<INT:1>\n"
        );
    }

    #[test]
    fn within_and_and() {
        assert_eq!(
            parsed("let X = 1 and Y = 2 within Z = 3 in Z"),
            "let\n.within\n..and\n...=\n....<ID:X>\n....<INT:1>\n...=\n....<ID:Y>\n....<INT:2>\n..=\n...<ID:Z>\n...<INT:3>\n.<ID:Z>\n"
        );
    }

    #[test]
    fn at_infix() {
        assert_eq!(
            parsed("1 @ Plus 2"),
            "@\n.<INT:1>\n.<ID:Plus>\n.<INT:2>\n"
        );
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let tokens = Lexer::lex(Source::source("1 )")).unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn missing_in_is_rejected() {
        let tokens = Lexer::lex(Source::source("let X = 1 X")).unwrap();
        assert!(parse(tokens).is_err());
    }
}
