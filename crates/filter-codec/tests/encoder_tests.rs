use filter_codec::{deserialize, escape, serialize, FilterPredicate, StaticDomain, ValueDomain};

/// Two runsets with the status and category lists of the results table.
fn domain() -> StaticDomain {
    let status = ["true", "false", "TIMEOUT", "OOM", "false(reach)"];
    let category = ["correct ", "wrong ", "missing ", "unknown "];
    StaticDomain::new()
        .with_runset(status, category)
        .with_runset(status, category)
}

/// Everything in `base` except the `unchecked` entries, as the table's
/// checkbox list produces them.
fn selection<'a>(base: &[&'a str], unchecked: &[&str]) -> Vec<&'a str> {
    base.iter()
        .copied()
        .filter(|v| !unchecked.contains(v))
        .collect()
}

fn statuses(runset: usize, values: &[&str]) -> Vec<FilterPredicate> {
    values
        .iter()
        .map(|v| FilterPredicate::status(runset, *v))
        .collect()
}

fn categories(runset: usize, values: &[&str]) -> Vec<FilterPredicate> {
    values
        .iter()
        .map(|v| FilterPredicate::category(runset, *v))
        .collect()
}

const STATUS: [&str; 5] = ["true", "false", "TIMEOUT", "OOM", "false(reach)"];
const CATEGORY: [&str; 4] = ["correct ", "wrong ", "missing ", "unknown "];

// ============================================================================
// Id and literal filters
// ============================================================================

#[test]
fn encode_id_filter() {
    let filters = vec![FilterPredicate::id(["abc", "def"])];
    assert_eq!(serialize(&filters, &domain()), "id(values(abc,def))");
}

#[test]
fn encode_id_filter_keeps_caller_order_and_escapes() {
    let filters = vec![FilterPredicate::id(["z z", "a,b", "z z"])];
    assert_eq!(
        serialize(&filters, &domain()),
        "id(values(z%20z,a%2Cb,z%20z))"
    );
}

#[test]
fn encode_value_filters_for_one_runset() {
    let filters = vec![
        FilterPredicate::value(0, 1, "cputime", "1223:4567"),
        FilterPredicate::value(0, 2, "hostname", "satu"),
    ];
    let expected = format!(
        "0(1*cputime*(value({})),2*hostname*(value(satu)))",
        escape("1223:4567")
    );
    assert_eq!(serialize(&filters, &domain()), expected);
    assert_eq!(
        expected,
        "0(1*cputime*(value(1223%3A4567)),2*hostname*(value(satu)))"
    );
}

#[test]
fn encode_value_filters_in_multiple_runsets() {
    let filters = vec![
        FilterPredicate::value(0, 1, "cputime", "1223:4567"),
        FilterPredicate::value(1, 1, "cputime", ":4567"),
        FilterPredicate::value(0, 2, "hostname", "satu"),
        FilterPredicate::value(1, 2, "hostname", "tilo"),
    ];
    assert_eq!(
        serialize(&filters, &domain()),
        "0(1*cputime*(value(1223%3A4567)),2*hostname*(value(satu))),\
         1(1*cputime*(value(%3A4567)),2*hostname*(value(tilo)))"
    );
}

#[test]
fn encode_id_filter_goes_first() {
    let filters = vec![
        FilterPredicate::value(0, 1, "cputime", "1223:4567"),
        FilterPredicate::value(1, 1, "cputime", ":4567"),
        FilterPredicate::value(0, 2, "hostname", "satu"),
        FilterPredicate::value(1, 2, "hostname", "tilo"),
        FilterPredicate::id(["abc", "def"]),
    ];
    assert_eq!(
        serialize(&filters, &domain()),
        "id(values(abc,def)),\
         0(1*cputime*(value(1223%3A4567)),2*hostname*(value(satu))),\
         1(1*cputime*(value(%3A4567)),2*hostname*(value(tilo)))"
    );
}

#[test]
fn encode_orders_runsets_and_columns_numerically() {
    let filters = vec![
        FilterPredicate::value(10, 3, "memory", "1"),
        FilterPredicate::value(2, 11, "walltime", "2"),
        FilterPredicate::value(2, 9, "cputime", "3"),
    ];
    assert_eq!(
        serialize(&filters, &domain()),
        "2(9*cputime*(value(3)),11*walltime*(value(2))),10(3*memory*(value(1)))"
    );
}

#[test]
fn encode_empty_list() {
    assert_eq!(serialize(&[], &domain()), "");
}

// ============================================================================
// Status sets
// ============================================================================

#[test]
fn encode_status_not_in() {
    let filters = statuses(0, &selection(&STATUS, &["true", "false"]));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(status(notIn(true,false))))"
    );
}

#[test]
fn encode_status_in() {
    let filters = statuses(0, &selection(&STATUS, &["true", "false", "TIMEOUT"]));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(status(in(OOM,false%28reach%29))))"
    );
}

#[test]
fn encode_status_in_multiple_runsets() {
    let mut filters = statuses(0, &selection(&STATUS, &["true", "false", "TIMEOUT"]));
    filters.extend(statuses(1, &selection(&STATUS, &["true", "false"])));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(status(in(OOM,false%28reach%29)))),\
         1(0*status*(status(notIn(true,false))))"
    );
}

#[test]
fn encode_status_in_follows_domain_order() {
    let filters = statuses(0, &["false(reach)", "OOM"]);
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(status(in(OOM,false%28reach%29))))"
    );
}

#[test]
fn encode_status_for_unknown_runset_lists_values() {
    let filters = statuses(5, &["true", "false", "OOM"]);
    assert_eq!(
        serialize(&filters, &domain()),
        "5(0*status*(status(in(true,false,OOM))))"
    );
}

// ============================================================================
// Category sets
// ============================================================================

#[test]
fn encode_category_not_in() {
    let filters = categories(0, &selection(&CATEGORY, &["unknown "]));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(category(notIn(unknown))))"
    );
}

#[test]
fn encode_category_in() {
    let filters = categories(0, &selection(&CATEGORY, &["correct ", "wrong "]));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(category(in(missing,unknown))))"
    );
}

#[test]
fn encode_category_in_multiple_runsets() {
    let mut filters = categories(0, &selection(&CATEGORY, &["correct ", "wrong "]));
    filters.extend(categories(1, &selection(&CATEGORY, &["unknown "])));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(category(in(missing,unknown)))),\
         1(0*status*(category(notIn(unknown))))"
    );
}

#[test]
fn encode_category_strips_only_one_marker() {
    let domain = StaticDomain::new().with_runset(Vec::<String>::new(), ["odd  ", "a ", "b "]);
    let filters = categories(0, &["odd  "]);
    assert_eq!(
        serialize(&filters, &domain),
        "0(0*status*(category(in(odd%20))))"
    );
}

// ============================================================================
// Mixed groups in one runset
// ============================================================================

#[test]
fn encode_status_column_groups_share_index_zero() {
    let mut filters = vec![FilterPredicate::value(0, 1, "cputime", "5")];
    filters.extend(categories(0, &["wrong "]));
    filters.extend(statuses(0, &["OOM"]));
    assert_eq!(
        serialize(&filters, &domain()),
        "0(0*status*(status(in(OOM))),0*status*(category(in(wrong))),1*cputime*(value(5)))"
    );
}

// ============================================================================
// Empty values
// ============================================================================

#[test]
fn encode_single_empty_id_survives_decoding() {
    let filters = vec![FilterPredicate::id([""])];
    let text = serialize(&filters, &domain());
    assert_eq!(text, "id(values())");
    assert_eq!(deserialize(&text, &domain()).unwrap(), filters);
}

#[test]
fn encode_id_filter_without_values_is_dropped() {
    let filters = vec![FilterPredicate::id(Vec::<String>::new())];
    assert_eq!(serialize(&filters, &domain()), "");
}

#[test]
fn encode_empty_status_value_survives_decoding() {
    let domain = StaticDomain::new().with_runset(["", "true", "false"], Vec::<String>::new());

    let filters = statuses(0, &[""]);
    let text = serialize(&filters, &domain);
    assert_eq!(text, "0(0*status*(status(in())))");
    assert_eq!(deserialize(&text, &domain).unwrap(), filters);

    let filters = statuses(0, &["", "true", "false"]);
    let text = serialize(&filters, &domain);
    assert_eq!(text, "0(0*status*(status(in(,true,false))))");
    assert_eq!(deserialize(&text, &domain).unwrap(), filters);

    let filters = statuses(0, &["true", "false"]);
    let text = serialize(&filters, &domain);
    assert_eq!(text, "0(0*status*(status(notIn())))");
    assert_eq!(deserialize(&text, &domain).unwrap(), filters);
}

// ============================================================================
// Domain in the results table's own layout
// ============================================================================

const TABLE_DOMAIN: &str = r#"{
    "statusValues": [
        [["true", "false", "TIMEOUT", "OOM", "false(reach)"]],
        [["true", "false", "TIMEOUT", "OOM", "false(reach)"]]
    ],
    "categoryValues": [
        [["correct ", "wrong ", "missing ", "unknown "]],
        [["correct ", "wrong ", "missing ", "unknown "]]
    ]
}"#;

#[test]
fn encode_with_table_domain_json() {
    let table = StaticDomain::from_json(TABLE_DOMAIN).unwrap();
    assert_eq!(table.status_values(1), domain().status_values(1));

    let mut filters = statuses(1, &["TIMEOUT", "OOM", "false(reach)"]);
    filters.extend(categories(0, &["correct ", "wrong ", "missing "]));
    let text = serialize(&filters, &table);
    assert_eq!(
        text,
        "0(0*status*(category(notIn(unknown)))),1(0*status*(status(notIn(true,false))))"
    );
    assert_eq!(deserialize(&text, &table).unwrap().len(), 6);
}
