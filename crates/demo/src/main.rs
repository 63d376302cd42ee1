//! Herald demo console.
//!
//! Reads command lines from stdin and dispatches them against a sample
//! `demo` command tree. Lines starting with `?` print completions instead.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use herald_command::{Audience, CommandModule, CommandRoot, CommandSource, Handler, MessageFunction, SenderType};
use herald_grammar::Dispatcher;
use herald_locale::{Locale, ReloadState};
use herald_text::Text;
use tracing::{error, info, warn};

/// Demo command line arguments.
#[derive(Parser, Debug)]
#[command(name = "herald-demo")]
#[command(about = "Interactive console for a sample herald command tree")]
struct Args {
	/// Directory holding `<lang>[_<REGION>].json` files
	#[arg(short, long, value_name = "DIR", default_value = "lang")]
	lang_dir: PathBuf,

	/// Locale of the console, e.g. `en_US`
	#[arg(long, default_value = "en_US")]
	locale: Locale,

	/// Write the default lang file for `--locale` and exit
	#[arg(long)]
	generate: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

/// The terminal user: holds every permission and prints plain text.
#[derive(Debug, Clone)]
struct Console {
	locale: Locale,
}

impl Audience for Console {
	fn send_message(&self, text: Text) {
		println!("{}", text.to_plain());
	}
}

impl CommandSource for Console {
	fn audience(&self) -> &dyn Audience {
		self
	}

	fn locale(&self) -> Locale {
		self.locale.clone()
	}

	fn has_permission(&self, _permission: &str) -> bool {
		true
	}

	fn sender_type(&self) -> SenderType {
		SenderType::Console
	}
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.with_writer(io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let root = CommandRoot::builder(&args.lang_dir).build()?;
	root.exception_handler(|error| error!(error = format!("{error:#}"), "command failed"));
	let module = demo_module(&root)?;

	if args.generate {
		if root.generate_default_lang(&args.locale) {
			info!(locale = %args.locale, dir = %args.lang_dir.display(), "default lang file written");
		} else {
			warn!(locale = %args.locale, "lang file not generated");
		}
		return Ok(());
	}

	if let ReloadState::Failure(error) = root.reload() {
		warn!(%error, "lang files not loaded");
	}

	let mut dispatcher = Dispatcher::new();
	for node in module.build(|console: &Console| Some(console.clone()))? {
		dispatcher.register(node);
	}
	info!(lang_dir = %args.lang_dir.display(), "type `demo` for help, `?<prefix>` for completions");

	let console = Console { locale: args.locale };
	let stdin = io::stdin();
	for line in stdin.lock().lines() {
		let line = line?;
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		if let Some(prefix) = line.strip_prefix('?') {
			println!("{}", dispatcher.suggest(prefix, &console).join(" "));
		} else if let Err(error) = dispatcher.execute(line, &console) {
			println!("{error}");
		}
		io::stdout().flush()?;
	}
	Ok(())
}

/// `demo print | echo <name> [note...] | reload | generate | child die`.
fn demo_module(root: &CommandRoot) -> anyhow::Result<CommandModule<Console>> {
	let greeting = root.register_key(root.declare_markup("demo.greeting", "<green>Hello from herald!</green>")?);
	let echoed = root.register_key(root.declare_markup("demo.echoed", "[name] says: [note]")?);
	let reloaded = root.register_key(root.declare_markup("demo.reloaded", "Lang files reloaded in [elapsed].")?);
	let busy = root.register_key(root.declare_markup("demo.busy", "<yellow>A reload is already running.</yellow>")?);

	let print = Handler::<Console>::new("print", root.declare_markup("demo.print", "Prints a greeting.")?)
		.aliases(["p"])
		.permission("demo.print")
		.executes(move |args| {
			greeting.notify(args.source());
			Ok(())
		});

	let echo = Handler::<Console>::new("echo", root.declare_markup("demo.echo", "Repeats a name and a note.")?)
		.source()
		.param::<String>("name")
		.optional_variadic::<String>("note")
		.executes(move |args| {
			let values = HashMap::from([
				("name".to_string(), Text::new(args.get::<String>("name").cloned().unwrap_or_default())),
				("note".to_string(), Text::new(args.get::<String>("note").map_or("nothing", String::as_str))),
			]);
			echoed.send_info(args.source(), &values);
			Ok(())
		});

	let reload = {
		let root = root.clone();
		Handler::<Console>::new("reload", root.declare_markup("demo.reload", "Reloads lang files.")?)
			.permission("demo.reload")
			.executes(move |args| match root.reload() {
				ReloadState::Success { elapsed } => {
					reloaded.send_info(args.source(), &HashMap::from([("elapsed".to_string(), Text::new(format!("{elapsed:?}")))]));
					Ok(())
				}
				ReloadState::InProgress => {
					busy.notify(args.source());
					Ok(())
				}
				ReloadState::Failure(error) => Err(error.into()),
			})
	};

	let generate = {
		let root = root.clone();
		let written = root.register_key(root.declare_markup("demo.generated", "Lang file written for [locale].")?);
		let loaded = root.register_key(root.declare_markup("demo.already_loaded", "<yellow>[locale] is already loaded.</yellow>")?);
		Handler::<Console>::new("generate", root.declare_markup("demo.generate", "Writes the default lang file of your locale.")?)
			.permission("demo.generate")
			.executes(move |args| {
				let locale = args.source().locale();
				let values = HashMap::from([("locale".to_string(), Text::new(locale.to_string()))]);
				if root.generate_default_lang(&locale) {
					written.send_info(args.source(), &values);
				} else {
					loaded.send_info(args.source(), &values);
				}
				Ok(())
			})
	};

	let die = Handler::<Console>::new(
		"die",
		MessageFunction::new(root.declare_markup("demo.die", "Fails on purpose.")?)
			.conditional(|console: &Console| console.sender_type() == SenderType::Console, root.declare_markup("demo.die.console", "Fails on purpose, even here.")?),
	)
	.executes(|_| Err(anyhow::anyhow!("the die command always fails")));

	let child_description = root.declare_markup("demo.child", "Nested commands.")?;
	let mut module = root.module::<Console>("demo");
	module
		.aliases(["d"])
		.description(root.declare_markup("demo.description", "Herald demo commands.")?)
		.executes([print, echo, reload, generate])
		.child("child", |child| {
			child.description(child_description).permission("demo.child").executes([die]);
		});
	Ok(module)
}
