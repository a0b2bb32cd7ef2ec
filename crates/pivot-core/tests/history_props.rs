use pivot_core::history::History;
use pivot_core::model::{Case, Status, Title};
use proptest::prelude::*;

fn arb_case() -> impl Strategy<Value = Case> {
    ("[A-Z][a-z]{2,10}", 0u8..3).prop_map(|(title, status)| {
        let status = match status {
            0 => Status::Active,
            1 => Status::Closed,
            _ => Status::Cold,
        };
        Case::new(Title::new(title).expect("generated title is valid")).with_status(status)
    })
}

fn arb_snapshots() -> impl Strategy<Value = Vec<Vec<Case>>> {
    prop::collection::vec(prop::collection::vec(arb_case(), 0..4), 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn undo_then_redo_restores_every_snapshot(
        initial in prop::collection::vec(arb_case(), 0..4),
        commits in arb_snapshots(),
    ) {
        let mut history = History::new(initial.clone());
        for (i, snapshot) in commits.iter().enumerate() {
            history.commit(snapshot.clone(), format!("commit {i}"));
        }

        for i in (0..commits.len()).rev() {
            let restored = history.undo().expect("undo within depth");
            prop_assert_eq!(restored.message, format!("commit {i}"));
            let expected = if i == 0 { &initial } else { &commits[i - 1] };
            prop_assert_eq!(&restored.snapshot, expected);
        }
        prop_assert!(history.undo().is_err());

        for snapshot in &commits {
            let restored = history.redo().expect("redo within depth");
            prop_assert_eq!(&restored.snapshot, snapshot);
        }
        prop_assert!(history.redo().is_err());
        prop_assert_eq!(history.len(), commits.len() + 1);
    }

    #[test]
    fn commit_after_undo_discards_redo_tail(
        commits in arb_snapshots(),
        undos in 1usize..12,
        replacement in prop::collection::vec(arb_case(), 0..4),
    ) {
        let mut history = History::new(Vec::new());
        for snapshot in &commits {
            history.commit(snapshot.clone(), "step");
        }
        let undone = undos.min(commits.len());
        for _ in 0..undone {
            history.undo().expect("undo within depth");
        }

        history.commit(replacement.clone(), "replacement");

        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.len(), commits.len() - undone + 2);
        prop_assert_eq!(&history.current().snapshot, &replacement);
    }
}
