use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::testing::TestSource;

fn parse<T: Any + Clone>(registry: &SerializerRegistry, raw: &str) -> Option<T> {
	let serializer = registry.find::<T>().expect("serializer registered");
	serializer.parse(&TestSource::console(), raw).map(|value| value.downcast_ref::<T>().cloned().expect("value of the registered type"))
}

#[rstest]
#[case("12", Some(12))]
#[case("-3", Some(-3))]
#[case("null", None)]
#[case("1.5", None)]
#[case("99999999999", None)]
fn integers(#[case] raw: &str, #[case] expected: Option<i32>) {
	let registry = SerializerRegistry::with_builtins(&MessageCatalog::new());
	assert_eq!(parse::<i32>(&registry, raw), expected);
}

#[rstest]
#[case("TRUE", Some(true))]
#[case("false", Some(false))]
#[case("yes", None)]
fn booleans(#[case] raw: &str, #[case] expected: Option<bool>) {
	let registry = SerializerRegistry::with_builtins(&MessageCatalog::new());
	assert_eq!(parse::<bool>(&registry, raw), expected);
}

#[test]
fn strings_chars_and_floats() {
	let registry = SerializerRegistry::with_builtins(&MessageCatalog::new());
	assert_eq!(parse::<String>(&registry, "hello"), Some("hello".to_string()));
	assert_eq!(parse::<String>(&registry, "null"), None);
	assert_eq!(parse::<char>(&registry, "é"), Some('é'));
	assert_eq!(parse::<char>(&registry, "ab"), None);
	assert_eq!(parse::<f64>(&registry, "2.5"), Some(2.5));
	assert_eq!(parse::<i8>(&registry, "300"), None);
}

#[test]
fn builtins_in_registration_order() {
	let registry = SerializerRegistry::with_builtins(&MessageCatalog::new());
	assert_eq!(
		registry.names(),
		["string", "integer", "double", "float", "long", "short", "byte", "character", "boolean"]
	);
}

#[test]
fn labels_and_null_message_are_declared() {
	let catalog = MessageCatalog::new();
	let registry = SerializerRegistry::with_builtins(&catalog);
	let integer = registry.find::<i32>().expect("integer serializer");

	assert_eq!(integer.required_label().key(), "internal.type.integer.required");
	assert_eq!(integer.required_label().default_text().to_plain(), "(integer)");
	assert_eq!(integer.optional_label().default_text().to_plain(), "[integer]");
	assert_eq!(integer.null_message().key(), NULL_OBJECT_KEY);
	assert!(catalog.get("internal.type.boolean.optional").is_some());
	assert_eq!(integer.suggest(&TestSource::console()), ["0", "1", "2"]);
}

#[test]
fn later_registration_overrides_in_place() {
	let catalog = MessageCatalog::new();
	let registry = SerializerRegistry::with_builtins(&catalog);
	let missing = catalog.declare("test.null.word", Text::new("No word in [value]!")).expect("declare");
	let previous = registry.register(
		Serializer::builder("word", |_, raw| (!raw.is_empty()).then(|| raw.to_uppercase()))
			.null_message(missing.clone())
			.build(&catalog),
	);

	assert_eq!(previous.map(|s| s.name().to_string()), Some("string".to_string()));
	assert_eq!(registry.names()[0], "word");
	assert_eq!(registry.len(), 9);
	assert_eq!(parse::<String>(&registry, "abc"), Some("ABC".to_string()));
	assert_eq!(registry.find::<String>().map(|s| s.null_message().clone()), Some(missing));
}

#[test]
fn lookup_is_by_exact_type() {
	let registry = SerializerRegistry::with_builtins(&MessageCatalog::new());
	assert!(registry.find::<u32>().is_none());
	assert!(registry.find::<&str>().is_none());
}
