use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{ArgumentType, CommandFailure, DispatchError, Dispatcher, StringReader, argument, literal};

struct Source {
	admin: bool,
}

const USER: Source = Source { admin: false };
const ADMIN: Source = Source { admin: true };

fn dispatcher() -> Dispatcher<Source> {
	let mut d = Dispatcher::new();
	d.register(
		literal("echo")
			.executes(|_| Ok(0))
			.then(argument("word", ArgumentType::String).executes(|ctx| Ok(ctx.get_string("word").map_or(0, |s| s.len() as i32)))),
	);
	d.register(literal("add").then(
		argument("a", ArgumentType::integer(-10, 10)).then(argument("b", ArgumentType::integer(-10, 10)).executes(|ctx| {
			Ok((ctx.get_integer("a").unwrap_or_default() + ctx.get_integer("b").unwrap_or_default()) as i32)
		})),
	));
	d.register(literal("say").then(argument("text", ArgumentType::Greedy).executes(|ctx| Ok(ctx.get_string("text").map_or(0, |s| s.len() as i32)))));
	d.register(literal("secret").requires(|s: &Source| s.admin).executes(|_| Ok(7)));
	d.register(literal("fail").executes(|_| Err(CommandFailure("boom".into()))));
	d
}

#[rstest]
#[case("echo", 0)]
#[case("echo hello", 5)]
#[case("echo \"two words\"", 9)]
#[case("echo ''", 0)]
#[case("add 2 3", 5)]
#[case("add -4 1", -3)]
#[case("say a b  c", 6)]
#[case("echo hello ", 5)]
fn executes_matching_command(#[case] input: &str, #[case] expected: i32) {
	assert_eq!(dispatcher().execute(input, &USER), Ok(expected));
}

#[test]
fn unknown_root_literal() {
	assert_eq!(dispatcher().execute("nope", &USER), Err(DispatchError::UnknownCommand { cursor: 0 }));
}

#[test]
fn missing_command_is_incomplete() {
	assert_eq!(dispatcher().execute("add 1", &USER), Err(DispatchError::IncompleteCommand));
	assert_eq!(dispatcher().execute("", &USER), Err(DispatchError::IncompleteCommand));
}

#[test]
fn extra_input_is_rejected() {
	assert_eq!(dispatcher().execute("add 1 2 3", &USER), Err(DispatchError::UnknownArgument { cursor: 8 }));
}

#[test]
fn out_of_range_integer_reports_argument() {
	let err = dispatcher().execute("add 11 1", &USER).unwrap_err();
	assert!(matches!(err, DispatchError::InvalidArgument { ref name, cursor: 4, .. } if name == "a"), "{err:?}");
}

#[test]
fn requirement_hides_node() {
	let d = dispatcher();
	assert_eq!(d.execute("secret", &USER), Err(DispatchError::UnknownCommand { cursor: 0 }));
	assert_eq!(d.execute("secret", &ADMIN), Ok(7));
}

#[test]
fn command_failure_is_surfaced() {
	assert_eq!(dispatcher().execute("fail", &USER), Err(DispatchError::Execution(CommandFailure("boom".into()))));
}

#[test]
fn literal_wins_over_argument() {
	let mut d: Dispatcher<()> = Dispatcher::new();
	d.register(
		literal("page")
			.then(literal("help").executes(|_| Ok(1)))
			.then(argument("n", ArgumentType::Word).executes(|_| Ok(2))),
	);
	assert_eq!(d.execute("page help", &()), Ok(1));
	assert_eq!(d.execute("page other", &()), Ok(2));
}

#[test]
fn backtracks_across_argument_siblings() {
	let mut d: Dispatcher<()> = Dispatcher::new();
	d.register(
		literal("pick")
			.then(argument("n", ArgumentType::integer(0, 9)).executes(|_| Ok(1)))
			.then(argument("w", ArgumentType::Word).executes(|_| Ok(2))),
	);
	assert_eq!(d.execute("pick 4", &()), Ok(1));
	assert_eq!(d.execute("pick four", &()), Ok(2));
}

#[test]
fn registering_same_literal_merges_children() {
	let mut d: Dispatcher<()> = Dispatcher::new();
	d.register(literal("a").then(literal("x").executes(|_| Ok(1))));
	d.register(literal("a").then(literal("y").executes(|_| Ok(2))));
	assert_eq!(d.root().children().len(), 1);
	assert_eq!(d.execute("a x", &()), Ok(1));
	assert_eq!(d.execute("a y", &()), Ok(2));
}

#[test]
fn suggests_literals_by_prefix() {
	let d = dispatcher();
	assert_eq!(d.suggest("e", &USER), vec!["echo".to_string()]);
	assert_eq!(d.suggest("s", &USER), vec!["say".to_string()]);
	assert_eq!(d.suggest("s", &ADMIN), vec!["say".to_string(), "secret".to_string()]);
}

#[test]
fn suggests_from_provider() {
	let mut d: Dispatcher<()> = Dispatcher::new();
	d.register(literal("color").then(
		argument("name", ArgumentType::Word)
			.suggests(|_| vec!["Red".into(), "green".into(), "gray".into()])
			.executes(|_| Ok(0)),
	));
	assert_eq!(d.suggest("color g", &()), vec!["green".to_string(), "gray".to_string()]);
	assert_eq!(d.suggest("color ", &()), vec!["Red".to_string(), "green".to_string(), "gray".to_string()]);
	assert!(d.suggest("colour ", &()).is_empty());
}

#[rstest]
#[case("\"a \\\" b\" rest", Some("a \" b"))]
#[case("'single' rest", Some("single"))]
#[case("\"open", None)]
#[case("\"bad \\n\"", None)]
fn reads_quoted_strings(#[case] input: &str, #[case] expected: Option<&str>) {
	let mut reader = StringReader::new(input);
	assert_eq!(reader.read_quoted().as_deref(), expected);
	if expected.is_none() {
		assert_eq!(reader.cursor(), 0);
	}
}
