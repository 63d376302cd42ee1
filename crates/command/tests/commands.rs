#![allow(unused_crate_dependencies)]

mod support;

use std::sync::Arc;

use herald_command::{BuildError, CommandModule, CommandSource, Handler, SenderKinds, Serializer};
use herald_grammar::{CommandFailure, DispatchError};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;
use support::{Player, dispatcher, root};

type Calls = Arc<Mutex<Vec<(String, Option<String>)>>>;

/// `cmd echo <name> [note...]` recording every call.
fn echo_module() -> (tempfile::TempDir, CommandModule<Player>, Calls) {
	let (dir, root) = root();
	let calls = Calls::default();
	let recorded = calls.clone();
	let description = root.declare_markup("test.echo", "Echoes a name.").expect("declare");
	let mut module = root.module::<Player>("cmd");
	module.aliases(["c"]).executes([Handler::new("echo", description)
		.aliases(["say"])
		.source()
		.param::<String>("name")
		.optional_variadic::<String>("note")
		.executes(move |args| {
			let name = args.get::<String>("name").cloned().unwrap_or_default();
			recorded.lock().push((name, args.get::<String>("note").cloned()));
			Ok(())
		})]);
	(dir, module, calls)
}

#[test]
fn optional_parameter_resolves_to_none() {
	let (_dir, module, calls) = echo_module();
	let dispatcher = dispatcher(&module);
	let player = Player::console();

	assert_eq!(dispatcher.execute("cmd echo alice", &Some(player.clone())), Ok(1));
	assert_eq!(dispatcher.execute("cmd echo bob hello there", &Some(player.clone())), Ok(1));
	assert_eq!(
		*calls.lock(),
		[("alice".to_string(), None), ("bob".to_string(), Some("hello there".to_string()))]
	);
	assert!(player.take_lines().is_empty());
}

#[rstest]
#[case("cmd echo")]
#[case("cmd echo null")]
fn missing_required_argument_sends_null_message(#[case] input: &str) {
	let (_dir, module, calls) = echo_module();
	let dispatcher = dispatcher(&module);
	let player = Player::console();

	assert_eq!(dispatcher.execute(input, &Some(player.clone())), Ok(0));
	assert!(calls.lock().is_empty());
	assert_eq!(player.take_lines(), ["null."]);
}

#[test]
fn aliases_share_the_command() {
	let (_dir, module, calls) = echo_module();
	let dispatcher = dispatcher(&module);
	let player = Some(Player::console());

	for input in ["c echo a", "cmd say b", "c say c"] {
		assert_eq!(dispatcher.execute(input, &player), Ok(1), "{input}");
	}
	assert_eq!(calls.lock().len(), 3);
}

#[test]
fn null_message_substitutes_raw_value() {
	let (_dir, root) = root();
	#[derive(Debug, Clone, PartialEq)]
	struct Name(String);
	let invalid = root.declare_markup("test.null.name", "<red>Invalid name: '[value]'</red>").expect("declare");
	root.add_serializer(
		Serializer::builder("name", |_, raw| raw.chars().all(char::is_alphabetic).then(|| Name(raw.to_string())))
			.suggests(|_| vec!["alice".into(), "bob".into()])
			.null_message(invalid)
			.build(root.catalog()),
	);
	let greeted = Arc::new(Mutex::new(Vec::new()));
	let sink = greeted.clone();
	let mut module = root.module::<Player>("cmd");
	module.executes([Handler::new("greet", root.declare_markup("test.greet", "Greets.").expect("declare"))
		.param::<Name>("who")
		.executes(move |args| {
			sink.lock().extend(args.get::<Name>("who").cloned());
			Ok(())
		})]);
	let dispatcher = dispatcher(&module);
	let player = Player::console();

	assert_eq!(dispatcher.execute("cmd greet b0b", &Some(player.clone())), Ok(0));
	assert_eq!(dispatcher.execute("cmd greet", &Some(player.clone())), Ok(0));
	assert_eq!(player.take_lines(), ["Invalid name: 'b0b'", "Invalid name: ''"]);

	assert_eq!(dispatcher.execute("cmd greet bob", &Some(player.clone())), Ok(1));
	assert_eq!(*greeted.lock(), [Name("bob".into())]);
	assert_eq!(dispatcher.suggest("cmd greet a", &Some(player)), ["alice"]);
}

#[test]
fn nullable_parameter_passes_none() {
	let (_dir, root) = root();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	let mut module = root.module::<Player>("cmd");
	module.executes([Handler::new("age", root.declare_markup("test.age", "Age.").expect("declare"))
		.nullable_param::<i32>("years")
		.executes(move |args| {
			sink.lock().push(args.at::<i32>(0).copied());
			Ok(())
		})]);
	let dispatcher = dispatcher(&module);
	let player = Player::console();
	let caller = Some(player.clone());

	assert_eq!(dispatcher.execute("cmd age 42", &caller), Ok(1));
	assert_eq!(dispatcher.execute("cmd age old", &caller), Ok(1));
	assert_eq!(*seen.lock(), [Some(42), None]);
	assert!(player.take_lines().is_empty());
}

#[test]
fn nullable_parameter_still_requires_a_token() {
	let (_dir, root) = root();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	let mut module = root.module::<Player>("cmd");
	module.executes([Handler::new("age", root.declare_markup("test.age", "Age.").expect("declare"))
		.nullable_param::<i32>("years")
		.executes(move |args| {
			sink.lock().push(args.at::<i32>(0).copied());
			Ok(())
		})]);
	let dispatcher = dispatcher(&module);
	let player = Player::console();

	assert_eq!(dispatcher.execute("cmd age", &Some(player.clone())), Ok(0));
	assert!(seen.lock().is_empty());
	assert_eq!(player.take_lines(), ["null."]);
}

#[test]
fn positional_arguments_mark_the_source() {
	let (_dir, root) = root();
	let seen = Arc::new(Mutex::new(None));
	let sink = seen.clone();
	let mut module = root.module::<Player>("cmd");
	module.executes([Handler::new("pos", root.declare_markup("test.pos", "Positions.").expect("declare"))
		.param::<i64>("first")
		.source()
		.param::<bool>("flag")
		.executes(move |args| {
			*sink.lock() = Some((args.len(), args.at::<i64>(0).copied(), args.is_source(1), args.at::<bool>(2).copied()));
			Ok(())
		})]);
	let dispatcher = dispatcher(&module);

	assert_eq!(dispatcher.execute("cmd pos 7 TRUE", &Some(Player::console())), Ok(1));
	assert_eq!(*seen.lock(), Some((3, Some(7), true, Some(true))));
}

#[test]
fn body_errors_go_to_exception_handlers() {
	let (_dir, root) = root();
	let reported = Arc::new(Mutex::new(Vec::new()));
	let first = reported.clone();
	let second = reported.clone();
	root.exception_handler(move |error| first.lock().push(format!("first: {error}")))
		.exception_handler(move |error| second.lock().push(format!("second: {error}")));
	let mut module = root.module::<Player>("cmd");
	module.executes([Handler::new("fail", root.declare_markup("test.fail", "Fails.").expect("declare"))
		.executes(|_| Err(anyhow::anyhow!("boom")))]);
	let dispatcher = dispatcher(&module);

	assert_eq!(
		dispatcher.execute("cmd fail", &Some(Player::console())),
		Err(DispatchError::Execution(CommandFailure("boom".into())))
	);
	assert_eq!(*reported.lock(), ["first: boom", "second: boom"]);
}

#[test]
fn permissions_gate_modules_handlers_and_help() {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module.permission("test.cmd").executes([Handler::new("print", root.declare_markup("test.print", "Prints.").expect("declare"))
		.permission("test.print")
		.executes(|_| Ok(()))]);
	let dispatcher = dispatcher(&module);

	let outsider = Some(Player::with_permissions(&[]));
	assert_eq!(dispatcher.execute("cmd", &outsider), Err(DispatchError::UnknownCommand { cursor: 0 }));

	let member = Some(Player::with_permissions(&["test.cmd"]));
	assert!(dispatcher.execute("cmd print", &member).is_err());
	assert!(dispatcher.execute("cmd help", &member).is_err());
	assert_eq!(dispatcher.execute("cmd", &member), Ok(0));

	let printer = Some(Player::with_permissions(&["test.cmd", "test.print", "test.cmd.help"]));
	assert_eq!(dispatcher.execute("cmd print", &printer), Ok(1));
	assert_eq!(dispatcher.execute("cmd help", &printer), Ok(0));
	assert!(dispatcher.suggest("cmd ", &member).is_empty());
	assert_eq!(dispatcher.suggest("cmd ", &printer), ["help".to_string(), "print".to_string()]);
}

#[test]
fn sender_types_and_predicates_gate() {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module.and_predicate(|player: &Player| player.has_permission("vip") || player.has_permission("*"));
	module.executes([Handler::new("die", root.declare_markup("test.die", "Dies.").expect("declare"))
		.senders(SenderKinds::PLAYER)
		.executes(|_| Ok(()))]);
	let dispatcher = dispatcher(&module);

	assert!(dispatcher.execute("cmd die", &Some(Player::console())).is_err());
	assert_eq!(dispatcher.execute("cmd die", &Some(Player::with_permissions(&["vip"]))), Ok(1));
	assert!(dispatcher.execute("cmd die", &Some(Player::with_permissions(&[]))).is_err());
}

#[test]
fn or_predicate_widens_the_gate() {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module
		.and_predicate(|player: &Player| player.has_permission("a"))
		.or_predicate(|player: &Player| player.has_permission("b"));
	let dispatcher = dispatcher(&module);

	assert_eq!(dispatcher.execute("cmd", &Some(Player::with_permissions(&["b"]))), Ok(0));
	assert!(dispatcher.execute("cmd", &Some(Player::with_permissions(&["c"]))).is_err());
}

#[test]
fn unmapped_source_fails_every_gate() {
	let (_dir, module, calls) = echo_module();
	let dispatcher = dispatcher(&module);

	assert_eq!(dispatcher.execute("cmd echo alice", &None), Err(DispatchError::UnknownCommand { cursor: 0 }));
	assert!(dispatcher.suggest("c", &None).is_empty());
	assert!(calls.lock().is_empty());
}

#[test]
fn nested_modules_build_under_parent() {
	let (_dir, root) = root();
	let ran = Arc::new(Mutex::new(0));
	let counter = ran.clone();
	let die = Handler::new("die", root.declare_markup("test.child.die", "Die.").expect("declare")).executes(move |_| {
		*counter.lock() += 1;
		Ok(())
	});
	let mut module = root.module::<Player>("cmd");
	module.child("child", |child| {
		child.permission("test.child").executes([die]);
	});
	let dispatcher = dispatcher(&module);

	assert_eq!(dispatcher.execute("cmd child die", &Some(Player::console())), Ok(1));
	assert!(dispatcher.execute("cmd child die", &Some(Player::with_permissions(&[]))).is_err());
	assert_eq!(*ran.lock(), 1);
}

#[rstest]
#[case::optional_before_required(
	Handler::new("h", key()).optional::<String>("a").param::<String>("b"),
	BuildError::InvalidPosition { handler: "h".into(), parameter: "a".into() }
)]
#[case::two_optionals(
	Handler::new("h", key()).optional::<String>("a").variadic::<String>("b"),
	BuildError::InvalidPosition { handler: "h".into(), parameter: "a".into() }
)]
#[case::variadic_before_source(
	Handler::new("h", key()).variadic::<String>("a").source(),
	BuildError::InvalidPosition { handler: "h".into(), parameter: "a".into() }
)]
#[case::repeated_name(
	Handler::new("h", key()).param::<String>("x").optional::<i32>("x"),
	BuildError::DuplicateParameter { handler: "h".into(), parameter: "x".into() }
)]
#[case::unknown_type(
	Handler::new("h", key()).param::<u32>("n"),
	BuildError::SerializerNotFound { handler: "h".into(), parameter: "n".into(), type_name: "u32" }
)]
fn invalid_declarations_fail_at_build(#[case] handler: Handler<Player>, #[case] expected: BuildError) {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module.executes([handler.executes(|_| Ok(()))]);
	assert_eq!(module.build(|caller: &support::Caller| caller.clone()).err(), Some(expected));
}

#[test]
fn missing_body_fails_at_build() {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module.child("inner", |inner| {
		inner.executes([Handler::new("nobody", key())]);
	});
	assert_eq!(
		module.build(|caller: &support::Caller| caller.clone()).err(),
		Some(BuildError::MissingBody { handler: "nobody".into() })
	);
}

fn handler_named_help(module: &mut CommandModule<Player>) {
	module.executes([Handler::new("help", key()).executes(|_| Ok(()))]);
}

fn two_handlers_with_one_name(module: &mut CommandModule<Player>) {
	module.executes([
		Handler::new("print", key()).executes(|_| Ok(())),
		Handler::new("print", key()).executes(|_| Ok(())),
	]);
}

fn alias_shadowing_a_child_module(module: &mut CommandModule<Player>) {
	module
		.child("inner", |_| {})
		.executes([Handler::new("print", key()).aliases(["inner"]).executes(|_| Ok(()))]);
}

fn child_module_aliased_help(module: &mut CommandModule<Player>) {
	module.child("inner", |inner| {
		inner.aliases(["help"]);
	});
}

#[rstest]
#[case::help(handler_named_help, "help")]
#[case::same_name(two_handlers_with_one_name, "print")]
#[case::alias(alias_shadowing_a_child_module, "inner")]
#[case::module_alias(child_module_aliased_help, "help")]
fn clashing_child_names_fail_at_build(#[case] configure: fn(&mut CommandModule<Player>), #[case] name: &str) {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	configure(&mut module);

	assert_eq!(
		module.build(|caller: &support::Caller| caller.clone()).err(),
		Some(BuildError::DuplicateChild {
			module: "cmd".into(),
			name: name.into(),
		})
	);
	assert!(module.show_help(1, &Player::console()).is_err());
}

#[test]
fn nested_modules_may_reuse_parent_child_names() {
	let (_dir, root) = root();
	let mut module = root.module::<Player>("cmd");
	module
		.executes([Handler::new("print", key()).executes(|_| Ok(()))])
		.child("inner", |inner| {
			inner.executes([Handler::new("print", key()).executes(|_| Ok(()))]);
		});
	let dispatcher = dispatcher(&module);

	assert_eq!(dispatcher.execute("cmd print", &Some(Player::console())), Ok(1));
	assert_eq!(dispatcher.execute("cmd inner print", &Some(Player::console())), Ok(1));
}

/// A description key from a throwaway catalog.
fn key() -> herald_locale::MessageKey {
	herald_locale::MessageCatalog::new()
		.declare("test.description", herald_text::Text::new("Description."))
		.expect("declare")
}
