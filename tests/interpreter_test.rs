use std::{
    fs::{read_dir, read_to_string},
    path::Path,
    time::Duration,
};

use color_eyre::{eyre::Context, Result};
use holyd::{
    interpreter::{
        context::BufferedContext,
        error::{ErrorCategory, RuntimeErrorKind},
        formatter::{BasicFormatter, ValueFormatter},
        value::Value,
        InterpreterPhase, TreeWalkInterpreter, MAX_CALL_DEPTH, MAX_EVALUATION_DEPTH,
    },
    lexer::{formatter::BasicFormatter as BasicTokenFormatter, formatter::TokenFormatter, Span},
    parser::{
        expression::{BinaryOperator, Expression, ExpressionKind, NumericLiteral},
        statement::{Declaration, EntryPoint, PrintStatement, Program, Statement},
        ParserErrorKind, MAX_NESTING_DEPTH,
    },
    HolyError,
};

#[test]
fn test_print() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/print");
    test_engine(input_dir)
}

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_arithmetic() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/arithmetic");
    test_engine(input_dir)
}

#[test]
fn test_function() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/function");
    test_engine(input_dir)
}

#[test]
fn test_builtin() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/builtin");
    test_engine(input_dir)
}

#[test]
fn test_comments() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comments");
    test_engine(input_dir)
}

#[test]
fn test_compile() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/compile");
    test_engine(input_dir)
}

fn run(source: &str) -> Result<TreeWalkInterpreter<BufferedContext>> {
    Ok(holyd::run(source, BufferedContext::new())?)
}

fn numeric(value: NumericLiteral) -> Expression {
    Expression::new(ExpressionKind::NumericLiteral(value), Span::default(), 1)
}

/// Wraps a single `println expr;` in an entry block.
fn print_program(expr: Expression) -> Program {
    let statement = Statement::Print(PrintStatement {
        expr,
        newline: true,
        span: Span::default(),
        line: 1,
    });
    Program {
        declarations: vec![Declaration::Entry(EntryPoint {
            body: vec![statement],
            span: Span::default(),
            line: 1,
        })],
    }
}

#[test]
fn test_hello_world() -> Result<()> {
    let interpreter = run("enter {\n    println \"Hello World\";\n}")?;
    assert_eq!(interpreter.context().output(), "Hello World\n");
    Ok(())
}

#[test]
fn test_final_environment() -> Result<()> {
    let interpreter = run("enter { x = 42; println x; }")?;
    assert_eq!(interpreter.environment().access("x"), Some(&Value::Integer(42)));
    assert_eq!(interpreter.environment().len(), 1);
    assert_eq!(interpreter.context().output(), "42\n");
    assert_eq!(interpreter.phase(), InterpreterPhase::Executing);
    Ok(())
}

#[test]
fn test_callee_bindings_are_discarded() -> Result<()> {
    let interpreter = run("func: f { y = 10; } enter { x = 1; call f; }")?;
    let environment = interpreter.environment();
    assert!(environment.contains("x"));
    assert!(!environment.contains("y"));
    assert_eq!(environment.depth(), 0);
    Ok(())
}

#[test]
fn test_program_without_entry_does_nothing() -> Result<()> {
    let interpreter = run("func: f { println \"unused\"; }")?;
    assert_eq!(interpreter.context().output(), "");
    assert!(interpreter.environment().is_empty());
    assert!(interpreter.get_function("f").is_some());
    assert_eq!(interpreter.last_value(), None);
    Ok(())
}

#[test]
fn test_later_function_declaration_wins() -> Result<()> {
    let interpreter = run(
        "func: f { println \"first\"; }\nfunc: f { println \"second\"; }\nenter { call f; }",
    )?;
    assert_eq!(interpreter.context().output(), "second\n");
    let Some(function) = interpreter.get_function("f") else {
        panic!("f should be registered");
    };
    assert_eq!(function.line, 2);
    Ok(())
}

#[test]
fn test_last_value() -> Result<()> {
    let interpreter = run("enter { x = 1; } enter { y = \"a\" + 2; }")?;
    assert_eq!(interpreter.last_value(), Some(&Value::String("a2".into())));
    Ok(())
}

#[test]
fn test_undefined_variable_reports_line() -> Result<()> {
    let Err(HolyError::Runtime(error)) =
        holyd::run("enter {\n  x = 1;\n  println y;\n}", BufferedContext::new())
    else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.kind, RuntimeErrorKind::UndefinedVariable("y".into()));
    assert_eq!(error.category(), ErrorCategory::NameError);
    assert_eq!(error.line, 3);
    assert_eq!(error.code(), "RT001");
    assert_eq!(
        error.to_string(),
        "NameError: Variable 'y' not defined at line 3"
    );
    Ok(())
}

#[test]
fn test_exit_stops_execution() -> Result<()> {
    let interpreter = run(
        "enter { println \"a\"; call exit(42); println \"b\"; }\nenter { println \"c\"; }",
    )?;
    assert_eq!(interpreter.exit_code(), Some(42));
    let context = interpreter.into_context();
    assert_eq!(context.exit_code(), Some(42));
    assert_eq!(context.output(), "a\n");
    Ok(())
}

#[test]
fn test_exit_from_nested_call() -> Result<()> {
    let interpreter = run("func: quit { call exit(); println \"no\"; } enter { call quit; println \"no\"; }")?;
    assert_eq!(interpreter.exit_code(), Some(0));
    assert_eq!(interpreter.context().output(), "");
    Ok(())
}

#[test]
fn test_exit_code_coercion() -> Result<()> {
    for (source, expected) in [
        ("enter { call exit(2.9); }", 2),
        ("enter { call exit(\"7\"); }", 7),
        ("enter { x = exit(5); }", 5),
    ] {
        let interpreter = run(source)?;
        assert_eq!(interpreter.exit_code(), Some(expected), "{source}");
    }
    Ok(())
}

#[test]
fn test_sleep_is_recorded() -> Result<()> {
    let interpreter = run("enter { call sleep(1); call sleep(0.25); call sleep(\"2\"); }")?;
    assert_eq!(
        interpreter.context().sleeps(),
        &[
            Duration::from_secs(1),
            Duration::from_millis(250),
            Duration::from_secs(2)
        ]
    );
    Ok(())
}

#[test]
fn test_negative_sleep_is_rejected() -> Result<()> {
    // Negative literals do not exist, so the duration comes from a numeric string.
    let tokens = holyd::tokenize("enter { call sleep(x); }")?;
    let program = holyd::parse(&tokens)?;
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter.interpret(&holyd::parse(&holyd::tokenize("enter { x = \"-1\"; }")?)?)?;
    let error = interpreter
        .interpret(&program)
        .expect_err("Negative durations are invalid");
    assert_eq!(error.category(), ErrorCategory::ValueError);
    assert!(interpreter.context().sleeps().is_empty());
    Ok(())
}

#[test]
fn test_builtins_shadow_user_functions() -> Result<()> {
    let interpreter = run("func: sleep { println \"user\"; } enter { call sleep(0); }")?;
    assert_eq!(interpreter.context().output(), "");
    assert_eq!(interpreter.context().sleeps(), &[Duration::ZERO]);
    Ok(())
}

#[test]
fn test_native_println_joins_arguments() -> Result<()> {
    let call = Expression::new(
        ExpressionKind::Call {
            name: "println".into(),
            arguments: vec![
                Expression::new(ExpressionKind::StringLiteral("a".into()), Span::default(), 1),
                numeric(NumericLiteral::Integer(1)),
                numeric(NumericLiteral::Float(2.5)),
            ],
        },
        Span::default(),
        1,
    );
    let interpreter = holyd::interpret(&print_program(call), BufferedContext::new())?;
    // The native call prints its arguments, then the statement prints its nil result.
    assert_eq!(interpreter.context().output(), "a 1 2.5\nnil\n");
    Ok(())
}

#[test]
fn test_call_depth_is_bounded() -> Result<()> {
    let Err(HolyError::Runtime(error)) =
        holyd::run("func: f { call f; } enter { call f; }", BufferedContext::new())
    else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.kind, RuntimeErrorKind::CallDepthExceeded(MAX_CALL_DEPTH));
    Ok(())
}

#[test]
fn test_deep_parentheses_are_rejected_before_running() {
    let source = format!("enter {{ println {}1{}; }}", "(".repeat(100_000), ")".repeat(100_000));
    let Err(HolyError::Parser(error)) = holyd::run(&source, BufferedContext::new()) else {
        panic!("Expected a parser error");
    };
    assert_eq!(error.kind, ParserErrorKind::NestingTooDeep(MAX_NESTING_DEPTH));
}

#[test]
fn test_long_addition_chain_is_rejected_before_running() {
    let chain = vec!["1"; 100_000].join(" + ");
    let source = format!("enter {{ x = {chain}; }}");
    let Err(HolyError::Parser(error)) = holyd::run(&source, BufferedContext::new()) else {
        panic!("Expected a parser error");
    };
    assert_eq!(error.kind, ParserErrorKind::NestingTooDeep(MAX_NESTING_DEPTH));
}

#[test]
fn test_evaluation_depth_is_bounded() {
    let mut expr = numeric(NumericLiteral::Integer(1));
    for _ in 0..2_000 {
        expr = Expression::binary(BinaryOperator::Add, numeric(NumericLiteral::Integer(1)), expr);
    }
    let Err(error) = holyd::interpret(&print_program(expr), BufferedContext::new()) else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.kind, RuntimeErrorKind::EvaluationTooDeep(MAX_EVALUATION_DEPTH));
    assert_eq!(error.category(), ErrorCategory::ValueError);
    assert_eq!(error.code(), "RT010");
}

#[test]
fn test_chain_within_the_limit_evaluates() -> Result<()> {
    let mut expr = numeric(NumericLiteral::Integer(1));
    for _ in 1..400 {
        expr = Expression::binary(BinaryOperator::Add, numeric(NumericLiteral::Integer(1)), expr);
    }
    let interpreter = holyd::interpret(&print_program(expr), BufferedContext::new())?;
    assert_eq!(interpreter.context().output(), "400\n");
    Ok(())
}

#[test]
fn test_arithmetic_on_hand_built_trees() -> Result<()> {
    for (operator, lhs, rhs, expected) in [
        (
            BinaryOperator::Subtract,
            NumericLiteral::Integer(5),
            NumericLiteral::Integer(3),
            "2\n",
        ),
        (
            BinaryOperator::Multiply,
            NumericLiteral::Integer(6),
            NumericLiteral::Float(0.5),
            "3.0\n",
        ),
        (
            BinaryOperator::Divide,
            NumericLiteral::Integer(7),
            NumericLiteral::Integer(2),
            "3.5\n",
        ),
        (
            BinaryOperator::Divide,
            NumericLiteral::Integer(4),
            NumericLiteral::Integer(2),
            "2.0\n",
        ),
    ] {
        let program = print_program(Expression::binary(operator, numeric(lhs), numeric(rhs)));
        let interpreter = holyd::interpret(&program, BufferedContext::new())?;
        assert_eq!(interpreter.context().output(), expected, "{operator}");
    }
    Ok(())
}

#[test]
fn test_division_by_zero() {
    let program = print_program(Expression::binary(
        BinaryOperator::Divide,
        numeric(NumericLiteral::Integer(1)),
        numeric(NumericLiteral::Float(0.0)),
    ));
    let Err(error) = holyd::interpret(&program, BufferedContext::new()) else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
    assert_eq!(error.category(), ErrorCategory::ValueError);
}

#[test]
fn test_comparison_operators_are_unknown() {
    for operator in [
        BinaryOperator::EqualEqual,
        BinaryOperator::BangEqual,
        BinaryOperator::LessThan,
        BinaryOperator::LessThanEqual,
        BinaryOperator::GreaterThan,
        BinaryOperator::GreaterThanEqual,
    ] {
        let program = print_program(Expression::binary(
            operator,
            numeric(NumericLiteral::Integer(1)),
            numeric(NumericLiteral::Integer(2)),
        ));
        let Err(error) = holyd::interpret(&program, BufferedContext::new()) else {
            panic!("Expected a runtime error");
        };
        assert_eq!(
            error.kind,
            RuntimeErrorKind::UnknownOperator(operator.symbol())
        );
        assert_eq!(error.category(), ErrorCategory::ValueError);
    }
}

#[test]
fn test_string_arithmetic_is_rejected() {
    let program = print_program(Expression::binary(
        BinaryOperator::Subtract,
        Expression::new(ExpressionKind::StringLiteral("a".into()), Span::default(), 1),
        numeric(NumericLiteral::Integer(1)),
    ));
    let Err(error) = holyd::interpret(&program, BufferedContext::new()) else {
        panic!("Expected a runtime error");
    };
    assert_eq!(error.category(), ErrorCategory::TypeError);
    assert_eq!(
        BasicFormatter.format_error(&error),
        "[line 1] TypeError: Unsupported operand types: string and integer"
    );
}

#[test]
fn test_state_persists_between_fragments() -> Result<()> {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    for fragment in [
        "enter { x = 42; }",
        "func: show { println x; }",
        "enter { call show; }",
    ] {
        let program = holyd::parse(&holyd::tokenize(fragment)?)?;
        interpreter.interpret(&program)?;
    }
    assert_eq!(interpreter.context().output(), "42\n");
    assert_eq!(interpreter.environment().to_string(), "{x: 42}");
    Ok(())
}

#[test]
fn test_failed_fragment_keeps_earlier_state() -> Result<()> {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter.interpret(&holyd::parse(&holyd::tokenize("enter { s = \"kept\"; }")?)?)?;
    let failing = holyd::parse(&holyd::tokenize("enter { t = 1; println missing; }")?)?;
    assert!(interpreter.interpret(&failing).is_err());
    assert_eq!(
        interpreter.environment().to_string(),
        "{s: \"kept\", t: 1}"
    );
    Ok(())
}

#[test]
fn test_nothing_runs_after_exit() -> Result<()> {
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter.interpret(&holyd::parse(&holyd::tokenize("enter { call exit(1); }")?)?)?;
    interpreter.interpret(&holyd::parse(&holyd::tokenize("enter { println \"late\"; }")?)?)?;
    assert_eq!(interpreter.context().output(), "");
    assert_eq!(interpreter.exit_code(), Some(1));
    Ok(())
}

struct TestCase {
    name: String,
    source: String,
    output: String,
    compiler_errors: String,
    runtime_errors: String,
}

impl TestCase {
    pub fn check(&self) {
        let tokens = match holyd::tokenize(&self.source) {
            Ok(tokens) => tokens,
            Err(e) => {
                let msg = BasicTokenFormatter::new(&self.source).format_error(&e);
                assert_eq!(
                    self.compiler_errors, msg,
                    "Failed test {} at tokenization.",
                    self.name,
                );
                return;
            }
        };

        let program = match holyd::parse(&tokens) {
            Ok(program) => program,
            Err(e) => {
                let msg = format!("[line {}] Error: {}", e.line, e.kind);
                assert_eq!(
                    self.compiler_errors, msg,
                    "Failed test {} at parsing.",
                    self.name,
                );
                return;
            }
        };
        assert!(
            self.compiler_errors.is_empty(),
            "Test {} should not have compiled.",
            self.name
        );

        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
        if let Err(e) = interpreter.interpret(&program) {
            let msg = BasicFormatter.format_error(&e);
            assert_eq!(
                self.runtime_errors, msg,
                "Failed test {} at runtime.",
                self.name,
            );
            return;
        }
        assert!(
            self.runtime_errors.is_empty(),
            "Test {} should have failed at runtime.",
            self.name
        );

        let msg = interpreter.into_context().into_data();
        assert_eq!(self.output, msg, "Failed test {} at print.", self.name);
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "hd" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(succeeded, "Some test cases in {input_dir:?} failed");

    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut source_lines = Vec::new();
    let mut expected_outputs = Vec::new();
    let mut expected_compiler_errors = Vec::new();
    let mut expected_runtime_errors = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        if let Some(comment_index) = line.find("// expect:") {
            let expected = line[comment_index..]
                .strip_prefix("// expect:")
                .unwrap()
                .trim()
                .to_string();
            expected_outputs.push(expected);
        } else if let Some(comment_index) = line.find("// expect compile error:") {
            let expected = &line[comment_index..]
                .strip_prefix("// expect compile error:")
                .unwrap()
                .trim();
            let expected = format!("[line {}] Error: {expected}", line_index + 1);
            expected_compiler_errors.push(expected);
        } else if let Some(comment_index) = line.find("// expect runtime error:") {
            let expected = &line[comment_index..]
                .strip_prefix("// expect runtime error:")
                .unwrap()
                .trim();
            let expected = format!("[line {}] {expected}", line_index + 1);
            expected_runtime_errors.push(expected);
        }
        source_lines.push(line.to_string());
    }

    expected_outputs.push(String::new());
    Ok(TestCase {
        name: test_name.into_owned(),
        source: source_lines.join("\n"),
        output: expected_outputs.join("\n"),
        compiler_errors: expected_compiler_errors.join("\n"),
        runtime_errors: expected_runtime_errors.join("\n"),
    })
}
