use crate::error::{Error, Result};
use crate::tokenizer::{Token, Tokenizer};
use crate::{ColumnDef, DataType, Value, ast::*};

/// Recursive-descent parser over the tokens of one statement or clause.
///
/// Grammar of the expression parts:
///
/// ```text
/// projection := '*' | expr [ 'as' ident ]
/// expr       := term { ('+' | '-') term }
/// term       := operand { ('*' | '/') operand }
/// operand    := ident | literal | '(' expr ')'
/// condition  := ident ( '==' | '!=' | '<=' | '>=' | '<' | '>' ) ( ident | literal )
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement> {
        let statement = match self.current_token() {
            Token::Create => self.parse_create_table(),
            Token::Load => {
                self.advance();
                Ok(Statement::Load(self.consume_ident()?))
            }
            Token::Store => {
                self.advance();
                Ok(Statement::Store(self.consume_ident()?))
            }
            Token::Drop => {
                self.advance();
                self.consume(Token::Table)?;
                Ok(Statement::DropTable(self.consume_ident()?))
            }
            Token::Print => {
                self.advance();
                Ok(Statement::Print(self.consume_ident()?))
            }
            Token::Insert => self.parse_insert(),
            Token::Select => self.parse_select().map(Statement::Select),
            _ => Err(self.unexpected("a command")),
        }?;

        // a trailing semicolon is optional
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        self.expect_end()?;
        Ok(statement)
    }

    /// Checks that every token was consumed.
    pub fn expect_end(&self) -> Result<()> {
        if !self.is_at_end() {
            return Err(Error::malformed(format!(
                "unexpected token after statement: {:?}",
                self.current_token()
            )));
        }
        Ok(())
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::malformed(format!(
            "expected {expected}, found {:?}",
            self.current_token()
        ))
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{expected:?}")))
        }
    }

    fn consume_ident(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Ident(string) => {
                let string = string.clone();
                self.advance();
                Ok(string)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn consume_data_type(&mut self) -> Result<DataType> {
        let data_type = match self.current_token() {
            Token::Int => DataType::Int,
            Token::StringType => DataType::String,
            Token::Float => DataType::Float,
            Token::Ident(other) => {
                return Err(Error::malformed(format!("invalid column type {other:?}")));
            }
            _ => return Err(self.unexpected("a column type")),
        };
        self.advance();
        Ok(data_type)
    }

    /// Runs `item` once, then again after every comma.
    fn comma_separated<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while matches!(self.current_token(), Token::Comma) {
            self.advance();
            items.push(item(self)?);
        }
        Ok(items)
    }

    // --- Statements ---

    fn parse_create_table(&mut self) -> Result<Statement> {
        self.consume(Token::Create)?;
        self.consume(Token::Table)?;
        let name = self.consume_ident()?;
        match self.current_token() {
            Token::LeftParen => {
                self.advance();
                let columns = self.parse_column_defs()?;
                self.consume(Token::RightParen)?;
                Ok(Statement::CreateTable(CreateTable { name, columns }))
            }
            Token::As => {
                self.advance();
                let select = self.parse_select()?;
                Ok(Statement::CreateTableAs(CreateTableAs { name, select }))
            }
            _ => Err(self.unexpected("'(' or 'as'")),
        }
    }

    fn parse_insert(&mut self) -> Result<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;
        self.consume(Token::Values)?;

        let values = if matches!(self.current_token(), Token::LeftParen) {
            self.advance();
            let values = self.parse_literal_list()?;
            self.consume(Token::RightParen)?;
            values
        } else {
            self.parse_literal_list()?
        };

        Ok(Statement::InsertInto(InsertInto { table, values }))
    }

    fn parse_select(&mut self) -> Result<Select> {
        self.consume(Token::Select)?;
        let projections = self.parse_projection_list()?;
        self.consume(Token::From)?;
        let tables = self.comma_separated(Self::consume_ident)?;

        let conditions = if matches!(self.current_token(), Token::Where) {
            self.advance();
            self.parse_condition_list()?
        } else {
            vec![]
        };

        Ok(Select {
            projections,
            tables,
            conditions,
        })
    }

    // --- Clauses ---

    /// Parses `name type, name type, ...`.
    pub fn parse_column_defs(&mut self) -> Result<Vec<ColumnDef>> {
        self.comma_separated(|p| {
            let name = p.consume_ident()?;
            let data_type = p.consume_data_type()?;
            Ok(ColumnDef { name, data_type })
        })
    }

    /// Parses a comma-separated list of literals.
    pub fn parse_literal_list(&mut self) -> Result<Vec<Value>> {
        self.comma_separated(Self::parse_literal)
    }

    fn parse_literal(&mut self) -> Result<Value> {
        self.try_literal()?
            .ok_or_else(|| self.unexpected("a literal"))
    }

    /// Consumes a literal if one starts at the current token.
    fn try_literal(&mut self) -> Result<Option<Value>> {
        let value = match self.current_token() {
            Token::Number(n) => Value::parse(n),
            Token::String(s) => Value::quoted(s),
            Token::NoValue => Value::NoValue,
            Token::Minus => {
                self.advance();
                return match self.current_token() {
                    Token::Number(n) => {
                        let value = Value::parse(&format!("-{n}"));
                        self.advance();
                        Ok(Some(value))
                    }
                    _ => Err(self.unexpected("a number after '-'")),
                };
            }
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(value))
    }

    /// Parses the comma-separated select list.
    pub fn parse_projection_list(&mut self) -> Result<Vec<Projection>> {
        self.comma_separated(Self::parse_projection)
    }

    fn parse_projection(&mut self) -> Result<Projection> {
        if matches!(self.current_token(), Token::Star) {
            self.advance();
            return Ok(Projection::Star);
        }

        let expr = self.parse_expr()?;
        let alias = if matches!(self.current_token(), Token::As) {
            self.advance();
            Some(self.consume_ident()?)
        } else {
            None
        };

        if alias.is_none() && !matches!(expr, Expr::Column(_)) {
            return Err(Error::malformed(format!(
                "expression {expr} requires an alias"
            )));
        }

        Ok(Projection::Expr { expr, alias })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current_token() {
                Token::Plus => ArithmeticOp::Add,
                Token::Minus => ArithmeticOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_operand()?;
        loop {
            let op = match self.current_token() {
                Token::Star => ArithmeticOp::Mul,
                Token::Slash => ArithmeticOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_operand()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        match self.current_token() {
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(Token::RightParen)?;
                Ok(expr)
            }
            Token::Dot => Err(Error::malformed("invalid operator '.*'")),
            _ => self.parse_simple_operand(),
        }
    }

    /// A column name or a literal.
    fn parse_simple_operand(&mut self) -> Result<Expr> {
        if let Token::Ident(name) = self.current_token() {
            let name = name.clone();
            self.advance();
            return Ok(Expr::Column(name));
        }
        self.try_literal()?
            .map(Expr::Literal)
            .ok_or_else(|| self.unexpected("a column or a literal"))
    }

    /// Parses condition clauses separated by `and`.
    pub fn parse_condition_list(&mut self) -> Result<Vec<Condition>> {
        let mut conditions = vec![self.parse_condition()?];
        while matches!(self.current_token(), Token::And) {
            self.advance();
            conditions.push(self.parse_condition()?);
        }
        Ok(conditions)
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let column = self
            .consume_ident()
            .map_err(|_| self.unexpected("a column name on the left of a condition"))?;

        let op = match self.current_token() {
            Token::Equal => ComparisonOp::Eq,
            Token::NotEqual => ComparisonOp::NotEq,
            Token::LowerEqual => ComparisonOp::LtEq,
            Token::GreaterEqual => ComparisonOp::GtEq,
            Token::Lower => ComparisonOp::Lt,
            Token::Greater => ComparisonOp::Gt,
            _ => return Err(self.unexpected("a comparison operator")),
        };
        self.advance();

        let right = self.parse_simple_operand()?;
        Ok(Condition { column, op, right })
    }
}

/// Tokenizes `text` and runs `rule` over the whole of it.
fn parse_all<T>(text: &str, rule: impl FnOnce(&mut Parser) -> Result<T>) -> Result<T> {
    let tokens = Tokenizer::new(text).tokenize()?;
    let mut parser = Parser::new(tokens);
    let parsed = rule(&mut parser)?;
    parser.expect_end()?;
    Ok(parsed)
}

/// Parses one complete statement.
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let tokens = Tokenizer::new(sql).tokenize()?;
    Parser::new(tokens).parse()
}

/// Parses a select list such as `a, b * 2 as c`.
pub fn parse_projections(text: &str) -> Result<Vec<Projection>> {
    parse_all(text, Parser::parse_projection_list)
}

/// Parses `and`-separated condition clauses. Blank text means no clause.
pub fn parse_conditions(text: &str) -> Result<Vec<Condition>> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }
    parse_all(text, Parser::parse_condition_list)
}

/// Parses a table header such as `id int, name string`.
pub fn parse_column_defs(text: &str) -> Result<Vec<ColumnDef>> {
    parse_all(text, Parser::parse_column_defs)
}

/// Parses a row of literals such as `1, 'a', NOVALUE`.
pub fn parse_literals(text: &str) -> Result<Vec<Value>> {
    parse_all(text, Parser::parse_literal_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Expr {
        Expr::Column(name.into())
    }

    fn lit(text: &str) -> Expr {
        Expr::Literal(Value::parse(text))
    }

    #[test]
    fn test_parse_create_table() {
        let statement = parse_statement("create table users (id int, name string)").unwrap();

        match statement {
            Statement::CreateTable(ct) => {
                assert_eq!(ct.name, "users");
                assert_eq!(ct.columns.len(), 2);
                assert_eq!(ct.columns[0].name, "id");
                assert_eq!(ct.columns[0].data_type, DataType::Int);
                assert_eq!(ct.columns[1].name, "name");
                assert_eq!(ct.columns[1].data_type, DataType::String);
            }
            _ => panic!("Expected CreateTable"),
        }
    }

    #[test]
    fn test_parse_create_table_invalid_type() {
        let err = parse_statement("create table t (a text)").unwrap_err();
        assert!(err.to_string().contains("invalid column type"));
    }

    #[test]
    fn test_parse_create_table_as_select() {
        let statement =
            parse_statement("create table t3 as select * from t1, t2 where a > 1").unwrap();

        let Statement::CreateTableAs(ct) = statement else {
            panic!("Expected CreateTableAs");
        };
        assert_eq!(ct.name, "t3");
        assert_eq!(ct.select.projections, vec![Projection::Star]);
        assert_eq!(ct.select.tables, vec!["t1", "t2"]);
        assert_eq!(ct.select.conditions.len(), 1);
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_statement("load t1").unwrap(), Statement::Load("t1".into()));
        assert_eq!(parse_statement("STORE t1;").unwrap(), Statement::Store("t1".into()));
        assert_eq!(
            parse_statement("drop table t1").unwrap(),
            Statement::DropTable("t1".into())
        );
        assert_eq!(parse_statement("print t1").unwrap(), Statement::Print("t1".into()));
        assert!(parse_statement("drop t1").is_err());
        assert!(parse_statement("explode t1").is_err());
        assert!(parse_statement("print t1 t2").is_err());
    }

    #[test]
    fn test_parse_insert() {
        for sql in [
            "insert into t values 1, 'a b', 2.5, NOVALUE, -3",
            "insert into t values (1, 'a b', 2.5, NOVALUE, -3)",
        ] {
            let Statement::InsertInto(insert) = parse_statement(sql).unwrap() else {
                panic!("Expected InsertInto");
            };
            assert_eq!(insert.table, "t");
            assert_eq!(
                insert.values,
                vec![
                    Value::parse("1"),
                    Value::parse("'a b'"),
                    Value::parse("2.5"),
                    Value::NoValue,
                    Value::parse("-3"),
                ]
            );
        }
    }

    #[test]
    fn test_parse_select_with_and_clauses() {
        let Statement::Select(select) =
            parse_statement("select a, b from t where a >= 2 and b != 'x'").unwrap()
        else {
            panic!("Expected Select");
        };

        assert_eq!(select.tables, vec!["t"]);
        assert_eq!(
            select.conditions,
            vec![
                Condition {
                    column: "a".into(),
                    op: ComparisonOp::GtEq,
                    right: lit("2"),
                },
                Condition {
                    column: "b".into(),
                    op: ComparisonOp::NotEq,
                    right: lit("'x'"),
                },
            ]
        );
    }

    #[test]
    fn test_parse_arithmetic_projection() {
        let projections = parse_projections("p * 2 as doubled").unwrap();

        assert_eq!(
            projections,
            vec![Projection::Expr {
                expr: Expr::Binary {
                    left: Box::new(col("p")),
                    op: ArithmeticOp::Mul,
                    right: Box::new(lit("2")),
                },
                alias: Some("doubled".into()),
            }]
        );
    }

    #[test]
    fn test_operator_precedence_is_explicit() {
        let projections = parse_projections("a + b * c as x, (a + b) * c as y").unwrap();

        let Projection::Expr { expr, .. } = &projections[0] else {
            panic!("Expected expression");
        };
        assert_eq!(expr.to_string(), "(a + (b * c))");

        let Projection::Expr { expr, .. } = &projections[1] else {
            panic!("Expected expression");
        };
        assert_eq!(expr.to_string(), "((a + b) * c)");
    }

    #[test]
    fn test_commas_inside_groups_do_not_split() {
        let projections = parse_projections("x, (x - -1) as y, z").unwrap();
        assert_eq!(projections.len(), 3);
    }

    #[test]
    fn test_arithmetic_requires_alias() {
        assert!(parse_projections("a + 1").is_err());
        // a bare column may still be renamed
        let projections = parse_projections("a as b").unwrap();
        assert_eq!(
            projections,
            vec![Projection::Expr {
                expr: col("a"),
                alias: Some("b".into()),
            }]
        );
    }

    #[test]
    fn test_dot_star_is_rejected() {
        let err = parse_projections(".*").unwrap_err();
        assert!(err.to_string().contains("invalid operator"));
    }

    #[test]
    fn test_condition_needs_column_on_the_left() {
        assert!(parse_conditions("1 == a").is_err());
        assert!(parse_conditions("a = 1").is_err());
        assert!(parse_conditions("a == b + 1").is_err());
    }

    #[test]
    fn test_blank_conditions() {
        assert!(parse_conditions("").unwrap().is_empty());
        assert!(parse_conditions("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_header_and_literals() {
        let columns = parse_column_defs("x int, y string,z float").unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnDef::new("x", DataType::Int),
                ColumnDef::new("y", DataType::String),
                ColumnDef::new("z", DataType::Float),
            ]
        );

        let values = parse_literals("1,'a, b',2.500").unwrap();
        assert_eq!(values[1], Value::parse("'a, b'"));
    }
}
