use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ukkonen::tree::{NodeId, SuffixTree, ROOT};

fn build_tree(word: &str) -> SuffixTree {
    let mut tree = SuffixTree::new(word);
    tree.build().unwrap();
    tree
}

fn path_label(tree: &SuffixTree, id: NodeId) -> String {
    let mut labels = Vec::new();
    let mut cur = id;
    while cur != ROOT {
        labels.push(tree.edge_label(cur));
        cur = tree.node(cur).parent();
    }
    labels.reverse();
    labels.concat()
}

fn assert_all_suffixes_present(tree: &SuffixTree, word: &str) {
    let chars: Vec<char> = word.chars().collect();
    for i in 0..chars.len() {
        let suffix: String = chars[i..].iter().collect();
        assert!(
            tree.find(&suffix).unwrap(),
            "word: {word}, suffix: {suffix}"
        );
    }
}

/// Structural invariants that must hold on every built tree.
fn assert_well_formed(tree: &SuffixTree, word: &str) {
    let n = word.chars().count();
    assert!(tree.node_count() <= 2 * n.max(1), "word: {word}");

    for (id, node) in tree.nodes() {
        for (&symbol, &child) in node.children() {
            assert_eq!(tree.node(child).parent(), id);
            assert_eq!(tree.edge_label(child).chars().next(), Some(symbol));
        }
        if node.is_leaf() {
            assert!(node.children().is_empty());
            assert_eq!(tree.edge_end(id), n, "leaf edge not open to the end");
        } else if id != ROOT {
            assert!(node.children().len() >= 2, "unary internal node");
            let link = node.suffix_link().expect("internal node without suffix link");
            let label = path_label(tree, id);
            let tail = &label[label.chars().next().unwrap().len_utf8()..];
            assert_eq!(path_label(tree, link), tail, "suffix link mislinked");
        }
    }
}

fn leaf_labels(tree: &SuffixTree) -> BTreeSet<String> {
    tree.nodes()
        .filter(|(_, node)| node.is_leaf())
        .map(|(id, _)| path_label(tree, id))
        .collect()
}

fn random_word(rng: &mut ChaCha8Rng, length: usize, alphabet: &[char]) -> String {
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

proptest! {
    #[test]
    fn prop_suffix_completeness(word in "[a-e]{0,32}") {
        let tree = build_tree(&word);
        assert_all_suffixes_present(&tree, &word);
    }

    #[test]
    fn prop_substring_soundness(word in "[a-d]{0,24}") {
        let tree = build_tree(&word);
        let chars: Vec<char> = word.chars().collect();
        for i in 0..=chars.len() {
            for j in i..=chars.len() {
                let sub: String = chars[i..j].iter().collect();
                prop_assert!(tree.find(&sub).unwrap(), "substring {sub} of {word}");
            }
        }
    }

    #[test]
    fn prop_foreign_symbol_rejected(
        word in "[a-m]{0,24}",
        query in "[a-m]{0,8}[x-z][a-m]{0,8}",
    ) {
        let tree = build_tree(&word);
        prop_assert!(!tree.find(&query).unwrap());
    }

    #[test]
    fn prop_structure_well_formed(word in "[a-c]{0,32}") {
        let tree = build_tree(&word);
        assert_well_formed(&tree, &word);
    }

    #[test]
    fn prop_node_count_bound(word in "[a-z]{1,48}") {
        let tree = build_tree(&word);
        prop_assert!(tree.node_count() <= 2 * word.len());
    }

    #[test]
    fn prop_rebuild_is_deterministic(word in "[a-f]{0,32}") {
        let first = build_tree(&word);
        let second = build_tree(&word);
        prop_assert_eq!(first.node_count(), second.node_count());
        prop_assert_eq!(leaf_labels(&first), leaf_labels(&second));
    }
}

#[test]
fn random_short_words_contain_all_suffixes() {
    let alphabet: Vec<char> = ('a'..='z').collect();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5u64);

    for _ in 0..500 {
        let word = random_word(&mut rng, 8, &alphabet);
        let tree = build_tree(&word);
        assert_all_suffixes_present(&tree, &word);
    }
}

#[test]
fn random_long_words_over_small_alphabet() {
    let alphabet: Vec<char> = ('a'..='j').collect();
    let mut rng = ChaCha8Rng::seed_from_u64(0x2Au64);

    for _ in 0..500 {
        let word = random_word(&mut rng, 40, &alphabet);
        let tree = build_tree(&word);
        assert_all_suffixes_present(&tree, &word);
        assert_well_formed(&tree, &word);
    }
}

#[test]
fn degenerate_input_builds_quickly() {
    // A single repeated symbol maximizes implicit suffixes; without the
    // completed-suffix skip this input is quadratic and the test hangs.
    let word = "a".repeat(10_000) + "b";
    let tree = build_tree(&word);

    assert!(tree.find("aaaaab").unwrap());
    assert!(!tree.find("ba").unwrap());
    assert!(tree.node_count() <= 2 * word.len());
}
