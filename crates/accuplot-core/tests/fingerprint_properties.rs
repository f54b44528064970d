use accuplot_core::{fingerprint, fingerprint_all, parse_entries};

const A: &str = r#"[
  {"id": "exp_f32", "data": "exp.csv", "xname": "base_x",
   "ynames": [["max_ulp_error", "(max)", "-"]], "hue": "operation",
   "plot_params": {"xscale": "symlog", "ylim": [0, 100], "title": "{} (f32)"},
   "outputs": ["exp.svg"]},
  {"id": "log_f32", "data": "log.csv", "xname": "base_x",
   "ynames": [["max_ulp_error", "(max)", "-"]],
   "plot_params": {"yscale": "linear"}, "outputs": ["log.svg"]}
]"#;

// Mismo contenido: otro orden de claves, otro formato.
const A_REORDERED: &str = r#"[{"outputs":["exp.svg"],"plot_params":{"title":"{} (f32)","ylim":[0,100],"xscale":"symlog"},
"hue":"operation","ynames":[["max_ulp_error","(max)","-"]],"xname":"base_x","data":"exp.csv","id":"exp_f32"},
{"plot_params":{"yscale":"linear"},"outputs":["log.svg"],"ynames":[["max_ulp_error","(max)","-"]],"xname":"base_x",
"data":"log.csv","id":"log_f32"}]"#;

#[test]
fn fingerprint_is_deterministic() {
    let a = parse_entries(A).unwrap();
    let b = parse_entries(A).unwrap();
    assert_eq!(fingerprint_all(&a), fingerprint_all(&b));
    assert_eq!(fingerprint(&a[0]), fingerprint(&a[0]));
}

#[test]
fn fingerprint_ignores_key_order_and_formatting() {
    let a = parse_entries(A).unwrap();
    let b = parse_entries(A_REORDERED).unwrap();
    assert_eq!(fingerprint_all(&a), fingerprint_all(&b));
}

#[test]
fn changing_one_param_changes_only_that_entry() {
    let before = fingerprint_all(&parse_entries(A).unwrap());
    let after = fingerprint_all(&parse_entries(&A.replace("\"xscale\": \"symlog\"", "\"xscale\": \"linear\"")).unwrap());
    assert_ne!(before["exp_f32"], after["exp_f32"]);
    assert_eq!(before["log_f32"], after["log_f32"]);
}

#[test]
fn every_field_participates() {
    let base = fingerprint_all(&parse_entries(A).unwrap())["exp_f32"].clone();
    let mutations = [("\"exp.csv\"", "\"exp2.csv\""),
                     ("\"(max)\", \"-\"]], \"hue\"", "\"(max)\", \"--\"]], \"hue\""),
                     ("\"operation\"", "\"precision\""),
                     ("[0, 100]", "[0, 1000]"),
                     ("\"{} (f32)\"", "\"{} (f64)\""),
                     ("[\"exp.svg\"]", "[\"exp.svg\", \"exp.png\"]")];
    for (from, to) in mutations {
        let doc = A.replacen(from, to, 1);
        assert_ne!(doc, A, "mutation {from} -> {to} did not apply");
        let fp = fingerprint_all(&parse_entries(&doc).unwrap())["exp_f32"].clone();
        assert_ne!(fp, base, "mutation {from} -> {to} kept the fingerprint");
    }
}

#[test]
fn volatile_annotations_do_not_change_fingerprint() {
    let base = fingerprint_all(&parse_entries(A).unwrap());
    let doc = A.replacen("\"xscale\": \"symlog\"", "\"xscale\": \"symlog\", \"_generated_at\": \"2024-06-01T12:00:00Z\"", 1);
    assert_eq!(fingerprint_all(&parse_entries(&doc).unwrap()), base);
}

#[test]
fn unknown_top_level_key_changes_fingerprint() {
    let before = fingerprint_all(&parse_entries(A).unwrap());
    let typo = A.replace("\"hue\": \"operation\",", "\"hue\": \"operation\", \"tyoe\": \"scatter\",");
    let after = fingerprint_all(&parse_entries(&typo).unwrap());
    assert_ne!(before["exp_f32"], after["exp_f32"]);
    assert_eq!(before["log_f32"], after["log_f32"]);
}
