use lazy_static::lazy_static;
use quickcheck_macros::quickcheck;
use serde_json::{json, Value};
use treerule::{
    Annotation, Checker, CheckerOptions, MemoryLexicon, NodeSpec, ParseTree, Sentence, Tables,
    Token,
};

lazy_static! {
    static ref CHECKER: Checker = {
        let tables = Tables::from_json_reader(
            json!({
                "verb_subjects": {
                    "líka": {"nf": "þgf"},
                    "langa": {"þgf": "þf", "nf": "þf"}
                },
                "prepositions": {
                    "leita": {"af": "að"}
                }
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();
        let lexicon = MemoryLexicon::from_json_reader(
            json!([
                {"lemma": "bóndi", "category": "no", "variants": ["et", "kk", "gr", "þgf"], "form": "bóndanum"},
                {"lemma": "ég", "category": "pfn", "variants": ["et", "þf", "p1"], "form": "mig"}
            ])
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        Checker::new(tables, lexicon)
    };
}

fn word(text: &str, lemma: &str, category: &str) -> Value {
    json!({"text": text, "kind": "word", "analyses": [{"lemma": lemma, "category": category}]})
}

fn unknown(text: &str) -> Value {
    json!({"text": text, "kind": "word"})
}

fn punctuation(text: &str) -> Value {
    json!({"text": text, "kind": "punctuation"})
}

fn terminal(name: &str, token: usize) -> Value {
    json!({"kind": "terminal", "name": name, "token": token})
}

fn phrase(tag: &str, children: Vec<Value>) -> Value {
    json!({"kind": "nonterminal", "name": tag, "tag": tag, "children": children})
}

fn error_rule(name: &str, children: Vec<Value>) -> Value {
    json!({"kind": "nonterminal", "name": name, "tags": ["error"], "children": children})
}

fn sentence(tokens: Vec<Value>, tree: Option<Value>) -> Sentence {
    serde_json::from_value(json!({"tokens": tokens, "tree": tree})).unwrap()
}

fn spans(annotations: &[Annotation]) -> Vec<(usize, usize, &str)> {
    annotations
        .iter()
        .map(|x| (x.start(), x.end(), x.code()))
        .collect()
}

#[test]
fn nominative_subject_of_impersonal_verb() {
    // Bóndinn líkaði maturinn.
    let sentence = sentence(
        vec![
            word("Bóndinn", "bóndi", "no"),
            word("líkaði", "líka", "so"),
            word("maturinn", "matur", "no"),
            punctuation("."),
        ],
        Some(phrase(
            "IP",
            vec![
                phrase("NP-SUBJ", vec![terminal("no_et_nf_kk_gr", 0)]),
                phrase(
                    "VP",
                    vec![
                        terminal("so_1_nf_et_p3", 1),
                        phrase("NP-OBJ", vec![terminal("no_et_nf_kk_gr", 2)]),
                    ],
                ),
            ],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(0, 0, "P_WRONG_CASE_nf_þgf")]);
    assert_eq!(annotations[0].suggest(), Some("bóndanum"));
    assert_eq!(
        annotations[0].to_string(),
        "000-000: P_WRONG_CASE_nf_þgf Should probably be 'bóndanum' (the subject of the verb 'að líka' \
         should be in the dative case, not the nominative case) / [bóndanum]"
    );
}

#[test]
fn impersonal_terminal_with_wrong_subject_case() {
    // Mér langar heim
    let sentence = sentence(
        vec![
            word("Mér", "ég", "pfn"),
            word("langar", "langa", "so"),
            word("heim", "heim", "ao"),
        ],
        Some(phrase(
            "IP",
            vec![
                phrase("NP-SUBJ", vec![terminal("pfn_et_þgf_p1", 0)]),
                phrase(
                    "VP",
                    vec![
                        terminal("so_subj_op_et_þgf", 1),
                        phrase("ADVP", vec![terminal("ao", 2)]),
                    ],
                ),
            ],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(0, 0, "P_WRONG_CASE_þgf_þf")]);
    assert_eq!(annotations[0].suggest(), Some("mig"));
}

#[test]
fn supine_compound_with_wrong_subject_case() {
    // Mér hefur langað heim
    let sentence = sentence(
        vec![
            word("Mér", "ég", "pfn"),
            word("hefur", "hafa", "so"),
            word("langað", "langa", "so"),
            word("heim", "heim", "ao"),
        ],
        Some(phrase(
            "IP",
            vec![
                phrase("NP-SUBJ", vec![terminal("pfn_et_þgf_p1", 0)]),
                phrase(
                    "VP",
                    vec![
                        terminal("so_et_p3", 1),
                        terminal("so_subj_sagnb_þgf", 2),
                        phrase("ADVP", vec![terminal("ao", 3)]),
                    ],
                ),
            ],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(0, 0, "P_WRONG_CASE_þgf_þf")]);
    assert_eq!(annotations[0].suggest(), Some("mig"));
}

#[test]
fn redundant_word_is_deleted() {
    // Hann fór ekki heldur heim
    let sentence = sentence(
        vec![
            word("Hann", "hann", "pfn"),
            word("fór", "fara", "so"),
            word("ekki", "ekki", "ao"),
            word("heldur", "heldur", "st"),
            word("heim", "heim", "ao"),
        ],
        Some(phrase(
            "IP",
            vec![
                phrase("NP-SUBJ", vec![terminal("pfn_kk_et_nf", 0)]),
                phrase(
                    "VP",
                    vec![
                        terminal("so_0_et_p3", 1),
                        terminal("ao", 2),
                        error_rule("VillaHeldur", vec![terminal("st", 3)]),
                        terminal("ao", 4),
                    ],
                ),
            ],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(3, 3, "P_NT_Heldur")]);
    assert_eq!(annotations[0].text(), "'heldur' is probably superfluous");
    assert_eq!(annotations[0].suggest(), Some(""));
    assert!(!annotations[0].is_warning());
}

#[test]
fn foreign_sentence_discards_everything_else() {
    // 5 recognized words out of 20
    let mut tokens: Vec<Value> = (0..15).map(|i| unknown(&format!("foreign{}", i))).collect();
    tokens.extend((0..5).map(|_| word("og", "og", "st")));
    tokens[0] = json!({
        "text": "foreign0",
        "kind": "word",
        "error": {"code": "U001", "description": "Unknown word"}
    });

    let terminals: Vec<Value> = (0..20).map(|i| terminal("x", i)).collect();
    let sentence = sentence(
        tokens,
        Some(phrase(
            "S0",
            vec![error_rule("VillaHeldur", terminals)],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(0, 19, "E004")]);
}

#[test]
fn unparsable_sentence_keeps_token_errors() {
    let sentence = sentence(
        vec![
            word("Hann", "hann", "pfn"),
            json!({
                "text": "fór",
                "kind": "word",
                "analyses": [{"lemma": "fara", "category": "so"}],
                "error": {"code": "S001", "description": "Spelling", "span": 2}
            }),
            word("hemi", "heim", "ao"),
            punctuation("."),
        ],
        None,
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(spans(&annotations), vec![(0, 3, "E001"), (1, 2, "S001")]);
}

#[test]
fn verb_with_wrong_preposition() {
    // Ég leitaði af kettinum
    let tokens = vec![
        word("Ég", "ég", "pfn"),
        word("leitaði", "leita", "so"),
        word("af", "af", "fs"),
        word("kettinum", "köttur", "no"),
    ];
    let tree = phrase(
        "IP",
        vec![
            phrase("NP-SUBJ", vec![terminal("pfn_et_nf_p1", 0)]),
            phrase(
                "VP",
                vec![
                    phrase("VP", vec![terminal("so_0_et_p1", 1)]),
                    phrase(
                        "PP",
                        vec![
                            phrase("P", vec![terminal("fs_þgf", 2)]),
                            phrase("NP", vec![terminal("no_et_þgf_kk_gr", 3)]),
                        ],
                    ),
                ],
            ),
        ],
    );
    let sentence = sentence(tokens, Some(tree));

    let annotations = CHECKER.annotate(&sentence);
    assert_eq!(spans(&annotations), vec![(1, 2, "P001")]);
    assert_eq!(annotations[0].suggest(), Some("leitaði að"));

    let mut tables = Tables::default();
    tables.prepositions.insert("leita", "af", "að");
    let checker = Checker::new(tables, MemoryLexicon::default()).with_options(CheckerOptions {
        patterns: false,
        ..CheckerOptions::default()
    });
    assert!(checker.annotate(&sentence).is_empty());
}

#[test]
fn annotations_are_sorted_by_start_then_longest_first() {
    let sentence = sentence(
        vec![
            json!({
                "text": "Hinsvegar",
                "kind": "word",
                "analyses": [{"lemma": "hinsvegar", "category": "ao"}],
                "error": {"code": "S002", "description": "Should be 'hins vegar'", "span": 2}
            }),
            word("að", "að", "st"),
            word("hann", "hann", "pfn"),
            word("kom", "koma", "so"),
        ],
        Some(phrase(
            "S0",
            vec![
                error_rule("VillaSem", vec![terminal("ao", 0)]),
                error_rule("VillaAð", vec![terminal("st", 1)]),
                terminal("pfn_kk_et_nf", 2),
                error_rule("VillaNokkuð_et", vec![terminal("so_0_et_p3", 3)]),
            ],
        )),
    );

    let annotations = CHECKER.annotate(&sentence);

    assert_eq!(
        spans(&annotations),
        vec![
            (0, 1, "S002"),
            (0, 0, "P_NT_Sem"),
            (1, 1, "P_NT_Að/w"),
            (3, 3, "P_NT_Nokkuð"),
        ]
    );
}

#[test]
fn sentences_deserialize_with_trees() {
    let sentence = sentence(
        vec![word("Hún", "hún", "pfn"), word("sefur", "sofa", "so")],
        Some(phrase(
            "IP",
            vec![
                phrase("NP-SUBJ", vec![terminal("pfn_kvk_et_nf", 0)]),
                phrase("VP", vec![terminal("so_0_et_p3", 1)]),
            ],
        )),
    );
    let tree = ParseTree::new(NodeSpec::phrase(
        "IP",
        vec![
            NodeSpec::phrase("NP-SUBJ", vec![NodeSpec::terminal("pfn_kvk_et_nf", 0)]),
            NodeSpec::phrase("VP", vec![NodeSpec::terminal("so_0_et_p3", 1)]),
        ],
    ))
    .unwrap();

    assert_eq!(sentence.tree(), Some(&tree));
    assert!(CHECKER.annotate(&sentence).is_empty());
}

#[test]
fn trees_must_fit_their_sentence() {
    let result: Result<Sentence, _> = serde_json::from_value(json!({
        "tokens": [word("Hún", "hún", "pfn")],
        "tree": phrase("IP", vec![terminal("pfn_kvk_et_nf", 0), terminal("so_0_et_p3", 1)])
    }));

    assert!(result.is_err());
}

/// Builds a sentence from arbitrary words. Consecutive words are grouped by `groups`,
/// every other group is wrapped in an error rule.
fn arbitrary_sentence(words: Vec<(String, bool, u8)>, groups: Vec<u8>, parsed: bool) -> Sentence {
    let tokens: Vec<Token> = words
        .iter()
        .map(|(text, known, error)| {
            let mut token = Token::word(text.as_str());
            if *known {
                token = token.with_analysis(text.to_lowercase(), "no");
            }
            if error % 4 == 0 {
                token = token.with_error("S001", "Spelling", (*error % 5) as usize);
            }
            token
        })
        .collect();

    let tree = if parsed && !tokens.is_empty() {
        let mut children = Vec::new();
        let mut index = 0;
        let mut sizes = groups.iter().map(|x| (*x % 3) as usize + 1).cycle();

        while index < tokens.len() {
            let size = if groups.is_empty() {
                1
            } else {
                sizes.next().unwrap_or(1)
            };
            let end = (index + size).min(tokens.len());
            let terminals: Vec<NodeSpec> = (index..end)
                .map(|i| NodeSpec::terminal("no_et_nf_kk", i))
                .collect();

            if children.len() % 2 == 0 {
                children.push(NodeSpec::nonterminal("VillaHeldur", terminals).error());
            } else {
                children.extend(terminals);
            }
            index = end;
        }

        Some(ParseTree::new(NodeSpec::nonterminal("S0", children)).unwrap())
    } else {
        None
    };

    Sentence::new(tokens, tree).unwrap()
}

#[quickcheck]
fn annotations_are_in_bounds_and_ordered(
    words: Vec<(String, bool, u8)>,
    groups: Vec<u8>,
    parsed: bool,
) -> bool {
    let sentence = arbitrary_sentence(words, groups, parsed);
    let annotations = CHECKER.annotate(&sentence);

    let in_bounds = annotations
        .iter()
        .all(|x| x.start() <= x.end() && x.end() < sentence.len());
    let ordered = annotations.windows(2).all(|pair| {
        pair[0].start() < pair[1].start()
            || (pair[0].start() == pair[1].start() && pair[0].end() >= pair[1].end())
    });

    in_bounds && ordered
}

#[quickcheck]
fn annotation_is_idempotent(words: Vec<(String, bool, u8)>, groups: Vec<u8>, parsed: bool) -> bool {
    let sentence = arbitrary_sentence(words, groups, parsed);

    CHECKER.annotate(&sentence) == CHECKER.annotate(&sentence)
}
