mod util;

use matcher_gen::model::{InMemoryModel, MemberDef, TypeDef, TypeKind, Visibility};
use matcher_gen::{
    Diagnostic, DirectorySink, GeneratedUnit, GenerationMarker, GeneratorSettings,
    MatcherConfiguration, MatcherGenerator, Severity,
};
use util::{CONFIG, config, count, run, run_with};

fn example_model() -> InMemoryModel {
    InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.model.Person")
                .method("getName", "java.lang.String")
                .method("isAdult", "boolean")
                .member(MemberDef::method("setName", "void").with_parameter("java.lang.String")),
        )
        .type_def(TypeDef::new("com.example.model.Address").method("getCity", "java.lang.String"))
        .build()
        .unwrap()
}

fn order_model() -> InMemoryModel {
    InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.shop.Order")
                .method("getId", "long")
                .method("getLines", "java.util.List<com.example.shop.Order.Line>")
                .nested(TypeDef::new("Line").method("getQuantity", "int"))
                .nested(
                    TypeDef::new("Secret")
                        .with_visibility(Visibility::Private)
                        .nested(TypeDef::new("Exposed")),
                ),
        )
        .build()
        .unwrap()
}

#[test]
fn test_example_package() {
    let model = example_model();

    let round = run(&model, &[config(&["com.example.model"])]);

    assert!(round.report.claimed);
    assert_eq!(
        round.unit_names(),
        [
            "com.example.model.AddressMatcher",
            "com.example.model.PersonMatcher"
        ]
    );
    assert_eq!(round.report.generated, round.unit_names());
    assert!(round.messages(Severity::Warning).is_empty());
    assert!(round.messages(Severity::Note).is_empty());

    let person = round.unit("com.example.model.PersonMatcher");
    assert_eq!(count(&person.source, "public PersonMatcher withName("), 2);
    assert_eq!(count(&person.source, "public PersonMatcher withAdult("), 2);
    assert_eq!(count(&person.source, "withSetName"), 0);
    insta::assert_snapshot!("person_matcher", &person.source);

    let address = round.unit("com.example.model.AddressMatcher");
    assert_eq!(count(&address.source, "public AddressMatcher withCity("), 2);
    assert_eq!(address.marker.generator_id, "matcher_gen.MatcherGenerator");
    assert_eq!(address.marker.timestamp, "2023-11-14T22:13:20Z");
    assert_eq!(
        address.originating_elements,
        ["com.example.model.Address", CONFIG]
    );
}

#[test]
fn test_round_starts_with_note() {
    let model = example_model();

    let round = run(&model, &[config(&["com.example.model.Person"])]);

    let first = &round.diagnostics[0];
    assert_eq!(first.severity, Severity::Note);
    assert_eq!(first.message, "Matcher generation started");
}

#[test]
fn test_regeneration_skips_own_output() {
    let mut model = example_model();
    let configurations = [config(&["com.example.model"])];

    let first = run(&model, &configurations);
    for unit in &first.units {
        model.add_generated(unit).unwrap();
    }
    let second = run(&model, &configurations);

    assert_eq!(second.units, first.units);
    assert_eq!(
        second.messages(Severity::Note),
        [
            "Generation skipped for: 'com.example.model.AddressMatcher' because it is already generated by this processor",
            "Generation skipped for: 'com.example.model.PersonMatcher' because it is already generated by this processor",
        ]
    );
}

#[test]
fn test_nested_types() {
    let model = order_model();

    let round = run(&model, &[config(&["com.example.shop"])]);

    assert_eq!(round.unit_names(), ["com.example.shop.OrderMatcher"]);
    assert_eq!(
        round.messages(Severity::Note),
        ["Matcher generation skipped for non public type: com.example.shop.Order.Secret"]
    );

    let order = round.unit("com.example.shop.OrderMatcher");
    assert_eq!(
        order.originating_elements,
        ["com.example.shop.Order", CONFIG, "com.example.shop.Order.Line"]
    );
    assert_eq!(count(&order.source, "class ExposedMatcher"), 0);
    insta::assert_snapshot!("order_matcher", &order.source);
}

#[test]
fn test_nested_skip_names_configuration() {
    let model = order_model();

    let round = run(&model, &[config(&["com.example.shop"])]);

    let note = round
        .diagnostics
        .iter()
        .find(|diagnostic| diagnostic.element.as_deref() == Some("com.example.shop.Order.Secret"))
        .unwrap();
    let origin = note.origin.as_ref().unwrap();
    assert_eq!(origin.element, CONFIG);
    assert_eq!(origin.entry, None);
}

#[test]
fn test_stamped_nested_type_is_noted() {
    let marker = GenerationMarker::new("matcher_gen.MatcherGenerator", "2023-01-01T00:00:00Z");
    let model = InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.Outer")
                .method("getName", "java.lang.String")
                .nested(TypeDef::new("Open").method("getSize", "int"))
                .nested(TypeDef::new("StampedMatcher").generated(marker)),
        )
        .build()
        .unwrap();

    let round = run(&model, &[config(&["com.example"])]);

    assert_eq!(round.unit_names(), ["com.example.OuterMatcher"]);
    let source = &round.units[0].source;
    assert_eq!(count(source, "public static class OpenMatcher "), 1);
    assert_eq!(count(source, "StampedMatcherMatcher"), 0);
    assert_eq!(
        round.messages(Severity::Note),
        ["Generation skipped for: 'com.example.Outer.StampedMatcher' because it is already generated by this processor"]
    );
}

#[test]
fn test_stamped_root_reports_nothing_below_it() {
    let marker = GenerationMarker::new("matcher_gen.MatcherGenerator", "2023-01-01T00:00:00Z");
    let model = InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.PersonMatcher")
                .generated(marker)
                .nested(TypeDef::new("Hidden").with_visibility(Visibility::Private)),
        )
        .build()
        .unwrap();

    let round = run(&model, &[config(&["com.example"])]);

    assert!(round.units.is_empty());
    assert_eq!(
        round.messages(Severity::Note),
        ["Generation skipped for: 'com.example.PersonMatcher' because it is already generated by this processor"]
    );
}

#[test]
fn test_keyword_and_digit_properties() {
    let model = InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.Flags")
                .method("isDefault", "boolean")
                .method("getPackage", "java.lang.String")
                .method("is18", "boolean")
                .method("get2ndName", "java.lang.String"),
        )
        .build()
        .unwrap();

    let round = run(&model, &[config(&["com.example.Flags"])]);

    let source = &round.units[0].source;
    assert_eq!(count(source, "public FlagsMatcher withDefault(final boolean value) {"), 1);
    assert_eq!(count(source, "beanPropertyMatcher.with(\"default\", matcher);"), 1);
    assert_eq!(count(source, "public FlagsMatcher withPackage(final String value) {"), 1);
    assert_eq!(count(source, "public FlagsMatcher with18(final boolean value) {"), 1);
    assert_eq!(count(source, "beanPropertyMatcher.with(\"18\", Matchers.equalTo(value));"), 1);
    assert_eq!(count(source, "public FlagsMatcher with2ndName(final String value) {"), 1);
}

#[test]
fn test_nested_name_generates_outermost() {
    let model = order_model();

    let round = run(&model, &[config(&["com.example.shop.Order.Line"])]);

    assert_eq!(round.unit_names(), ["com.example.shop.OrderMatcher"]);
    assert_eq!(
        count(
            &round.units[0].source,
            "public static class LineMatcher extends TypeSafeMatcher<Order.Line> {"
        ),
        1
    );
}

#[test]
fn test_package_and_member_type_generate_once() {
    let model = example_model();

    let round = run(
        &model,
        &[config(&[
            "com.example.model",
            "com.example.model.Person",
            "com.example.model.Person",
        ])],
    );

    assert_eq!(round.units.len(), 2);
}

#[test]
fn test_type_in_several_configurations_generates_once() {
    let model = example_model();
    let configurations = [
        MatcherConfiguration::new("com.example.FirstConfig", ["com.example.model.Person"]),
        MatcherConfiguration::new("com.example.SecondConfig", ["com.example.model"]),
    ];

    let round = run(&model, &configurations);

    assert_eq!(
        round.unit_names(),
        [
            "com.example.model.PersonMatcher",
            "com.example.model.AddressMatcher"
        ]
    );
    assert_eq!(
        round.unit("com.example.model.PersonMatcher").originating_elements,
        ["com.example.model.Person", "com.example.FirstConfig"]
    );
    assert_eq!(
        round.unit("com.example.model.AddressMatcher").originating_elements,
        ["com.example.model.Address", "com.example.SecondConfig"]
    );
}

#[test]
fn test_unknown_names_warn() {
    let model = example_model();

    let round = run(
        &model,
        &[config(&["com.example.missing", "com.example.model.Address"])],
    );

    assert_eq!(round.unit_names(), ["com.example.model.AddressMatcher"]);
    assert_eq!(
        round.messages(Severity::Warning),
        ["Neither a type nor a package exists for 'com.example.missing'"]
    );
    let warning = round
        .diagnostics
        .iter()
        .find(|diagnostic| diagnostic.severity == Severity::Warning)
        .unwrap();
    let origin = warning.origin.as_ref().unwrap();
    assert_eq!(origin.element, CONFIG);
    assert_eq!(origin.entry.as_deref(), Some("com.example.missing"));
}

#[test]
fn test_inherited_properties() {
    let model = InMemoryModel::builder()
        .type_def(
            TypeDef::new("com.example.Employee")
                .extends("com.example.Person")
                .implements("com.example.Identified")
                .method("getName", "java.lang.CharSequence")
                .method("getSalary", "java.math.BigDecimal"),
        )
        .type_def(
            TypeDef::new("com.example.Person")
                .method("getName", "java.lang.String")
                .method("isAdult", "boolean"),
        )
        .type_def(
            TypeDef::new("com.example.Identified")
                .with_kind(TypeKind::Interface)
                .method("getId", "java.util.UUID")
                .method("isAdult", "boolean"),
        )
        .build()
        .unwrap();

    let round = run(&model, &[config(&["com.example.Employee"])]);

    let source = &round.unit("com.example.EmployeeMatcher").source;
    assert_eq!(count(source, "public EmployeeMatcher withName(final CharSequence value) {"), 1);
    assert_eq!(count(source, "public EmployeeMatcher withName("), 2);
    assert_eq!(count(source, "public EmployeeMatcher withAdult("), 2);
    assert_eq!(count(source, "public EmployeeMatcher withSalary(final BigDecimal value) {"), 1);
    assert_eq!(count(source, "public EmployeeMatcher withId(final UUID value) {"), 1);

    let order: Vec<usize> = ["withName(", "withSalary(", "withAdult(", "withId("]
        .iter()
        .map(|method| source.find(method).unwrap())
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_settings_shape_output() {
    let model = example_model();
    let settings = GeneratorSettings {
        generator_id: "com.example.Gen".to_string(),
        indent: "\t".to_string(),
    };

    let round = run_with(&model, settings, &[config(&["com.example.model.Address"])]);

    let source = &round.units[0].source;
    assert!(source.contains(
        "@Generated(value = \"com.example.Gen\", date = \"2023-11-14T22:13:20Z\")\n"
    ));
    assert!(source.contains("\n\tpublic AddressMatcher() {\n\t\tbeanPropertyMatcher = "));
}

#[test]
fn test_invalid_settings_are_rejected() {
    let model = example_model();
    let settings = GeneratorSettings {
        indent: "--".to_string(),
        ..GeneratorSettings::default()
    };

    assert!(MatcherGenerator::new(&model, settings).is_err());
}

#[test]
fn test_without_configurations() {
    let model = example_model();

    let round = run(&model, &[]);

    assert!(!round.report.claimed);
    assert!(round.units.is_empty());
    assert_eq!(round.diagnostics.len(), 1);
}

#[test]
fn test_same_input_same_output() {
    let model = order_model();
    let configurations = [config(&["com.example.shop"])];

    let first = run(&model, &configurations);
    let second = run(&model, &configurations);

    assert_eq!(first.units, second.units);
}

#[test]
fn test_directory_sink_round() {
    let model = example_model();
    let dir = tempfile::tempdir().unwrap();
    let generator = MatcherGenerator::new(&model, GeneratorSettings::default())
        .unwrap()
        .with_clock(util::clock());
    let mut sink = DirectorySink::new(dir.path());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    generator
        .process(&[config(&["com.example.model"])], &mut diagnostics, &mut sink)
        .unwrap();

    let person = std::fs::read_to_string(
        dir.path()
            .join("com")
            .join("example")
            .join("model")
            .join("PersonMatcher.java"),
    )
    .unwrap();

    let mut expected: Vec<GeneratedUnit> = Vec::new();
    MatcherGenerator::new(&model, GeneratorSettings::default())
        .unwrap()
        .with_clock(util::clock())
        .process(
            &[config(&["com.example.model.Person"])],
            &mut Vec::<Diagnostic>::new(),
            &mut expected,
        )
        .unwrap();
    assert_eq!(person, expected[0].source);
}
