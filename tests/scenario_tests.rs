//! End-to-end move scenarios.
//!
//! Each test drives a hand-built record through the resolver and router
//! exactly as a client would: resolve a drop intent, submit the chosen
//! action, observe the committed record.

use casino_engine::{
    Action, ActionRouter, Card, CardSource, DragItem, DragSource, DropTarget, EntityId,
    GameConfig, MatchRecord, PlayerId, PlayerPair, Rank, StagingStack, Submission, Suit,
    TableEntity,
};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn record_with(hand0: Vec<Card>, hand1: Vec<Card>, table: Vec<Card>) -> MatchRecord {
    let hands = PlayerPair::new(|p| {
        if p.index() == 0 {
            hand0.clone()
        } else {
            hand1.clone()
        }
    });
    MatchRecord::from_deal(hands, table, Vec::new())
}

fn p0() -> PlayerId {
    PlayerId::new(0)
}

fn p1() -> PlayerId {
    PlayerId::new(1)
}

fn loose_ids(record: &MatchRecord) -> Vec<EntityId> {
    record.loose_cards().map(|lc| lc.id).collect()
}

/// A 5 dropped on a loose 5, with a second 5 and a 10 in hand, offers all
/// three interpretations: capture, same-value build, sum build.
#[test]
fn test_equal_value_drop_offers_capture_and_builds() {
    let router = ActionRouter::new(GameConfig::standard());
    let five_s = card(Rank::Five, Suit::Spades);
    let record = record_with(
        vec![five_s, card(Rank::Five, Suit::Diamonds), card(Rank::Ten, Suit::Hearts)],
        vec![card(Rank::Nine, Suit::Clubs)],
        vec![card(Rank::Five, Suit::Hearts)],
    );
    let target = loose_ids(&record)[0];

    let dragged = DragItem {
        card: five_s,
        source: DragSource::Hand,
    };
    let resolution = router.resolve_intent(&record, p0(), &dragged, &DropTarget::Entity(target));

    assert!(resolution.requires_modal);
    assert_eq!(resolution.options.len(), 3);

    let actions: Vec<_> = resolution.actions().cloned().collect();
    assert!(actions.iter().any(|a| matches!(
        a,
        Action::Capture { card, .. } if *card == five_s
    )));
    assert!(actions
        .iter()
        .any(|a| matches!(a, Action::CreateBuild { value: 5, .. })));
    assert!(actions
        .iter()
        .any(|a| matches!(a, Action::CreateBuild { value: 10, .. })));

    // Choosing the capture moves both fives to the pile and ends the turn.
    let mut record = record;
    let capture = actions
        .iter()
        .find(|a| matches!(a, Action::Capture { .. }))
        .unwrap()
        .clone();
    router
        .submit(&mut record, &Submission::new(p0(), capture))
        .unwrap();
    assert_eq!(record.capture_pile(p0()).len(), 2);
    assert_eq!(record.current_player, p1());
}

/// Build a [7,4,3] staging stack over two drops, resolve it into a build
/// of 7, then capture the build with the held 7.
#[test]
fn test_staged_grouping_build_and_capture() {
    let router = ActionRouter::new(GameConfig::standard());
    let four = card(Rank::Four, Suit::Clubs);
    let three = card(Rank::Three, Suit::Spades);
    let seven_s = card(Rank::Seven, Suit::Spades);
    let nine = card(Rank::Nine, Suit::Clubs);
    let mut record = record_with(
        vec![four, three, seven_s],
        vec![nine, card(Rank::Eight, Suit::Hearts)],
        vec![card(Rank::Seven, Suit::Hearts)],
    );
    let base = loose_ids(&record)[0];

    // Two hand drops: the second is the one allowed hand addition.
    router
        .submit(
            &mut record,
            &Submission::new(
                p0(),
                Action::StartStaging {
                    card: four,
                    source: CardSource::Hand,
                    target: base,
                },
            ),
        )
        .unwrap();
    router
        .submit(
            &mut record,
            &Submission::new(
                p0(),
                Action::ExtendStaging {
                    stack: base,
                    card: three,
                    source: CardSource::Hand,
                },
            ),
        )
        .unwrap();
    assert_eq!(record.stack_of(p0()).unwrap().cards.len(), 3);
    assert_eq!(record.current_player, p0());

    // The stack dropped on itself resolves through sequential grouping:
    // [7],[4,3] at the held value 7.
    let dragged = DragItem {
        card: seven_s,
        source: DragSource::Table(base),
    };
    let resolution = router.resolve_intent(&record, p0(), &dragged, &DropTarget::Entity(base));
    assert!(!resolution.requires_modal);
    let action = resolution.single().unwrap().clone();
    assert_eq!(action, Action::FinalizeBuild { stack: base, value: 7 });

    router
        .submit(&mut record, &Submission::new(p0(), action))
        .unwrap();
    let build = record.builds().next().unwrap();
    assert_eq!(build.value, 7);
    assert_eq!(build.cards.len(), 3);
    assert!(!build.extendable);
    assert_eq!(record.current_player, p1());

    // Opponent trails; the owner then captures the build.
    router
        .submit(&mut record, &Submission::new(p1(), Action::Trail { card: nine }))
        .unwrap();
    router
        .submit(
            &mut record,
            &Submission::new(
                p0(),
                Action::Capture {
                    card: seven_s,
                    source: CardSource::Hand,
                    targets: vec![base],
                },
            ),
        )
        .unwrap();
    assert_eq!(record.capture_pile(p0()).len(), 4);
    assert!(record.builds().next().is_none());
}

/// A [4,3,5,2] stack resolves at 7 as [4,3],[5,2].
#[test]
fn test_multi_group_stack_resolution() {
    let router = ActionRouter::new(GameConfig::standard());
    let seven = card(Rank::Seven, Suit::Spades);
    let mut record = record_with(vec![seven], vec![card(Rank::Nine, Suit::Clubs)], Vec::new());
    let id = record.alloc_entity();
    record.push_entity(TableEntity::Stack(StagingStack {
        id,
        owner: p0(),
        cards: vec![
            card(Rank::Four, Suit::Clubs),
            card(Rank::Three, Suit::Hearts),
            card(Rank::Five, Suit::Diamonds),
            card(Rank::Two, Suit::Clubs),
        ],
    }));

    let dragged = DragItem {
        card: seven,
        source: DragSource::Table(id),
    };
    let resolution = router.resolve_intent(&record, p0(), &dragged, &DropTarget::Entity(id));
    let action = resolution.single().unwrap().clone();
    assert_eq!(action, Action::FinalizeBuild { stack: id, value: 7 });

    router
        .submit(&mut record, &Submission::new(p0(), action))
        .unwrap();
    assert_eq!(record.builds().next().unwrap().value, 7);
}

/// An opponent's drop on a staging stack resolves to nothing.
#[test]
fn test_opponent_stack_is_private() {
    let router = ActionRouter::new(GameConfig::standard());
    let two = card(Rank::Two, Suit::Diamonds);
    let mut record = record_with(Vec::new(), vec![two], Vec::new());
    let id = record.alloc_entity();
    record.push_entity(TableEntity::Stack(StagingStack {
        id,
        owner: p0(),
        cards: vec![card(Rank::Four, Suit::Clubs), card(Rank::Three, Suit::Hearts)],
    }));

    let dragged = DragItem {
        card: two,
        source: DragSource::Hand,
    };
    let resolution = router.resolve_intent(&record, p1(), &dragged, &DropTarget::Entity(id));
    assert!(resolution.is_empty());
}

/// Merging two loose cards and immediately cancelling restores both to
/// the table as loose cards, with hands and piles untouched.
#[test]
fn test_table_staging_cancel_round_trip() {
    let router = ActionRouter::new(GameConfig::standard());
    let mut record = record_with(
        vec![card(Rank::Nine, Suit::Spades)],
        vec![card(Rank::Eight, Suit::Hearts)],
        vec![card(Rank::Four, Suit::Clubs), card(Rank::Three, Suit::Hearts)],
    );
    let hands_before = (record.hand(p0()).clone(), record.hand(p1()).clone());
    let ids = loose_ids(&record);

    router
        .submit(
            &mut record,
            &Submission::new(
                p0(),
                Action::TableToTable {
                    source: ids[0],
                    target: ids[1],
                },
            ),
        )
        .unwrap();
    router
        .submit(&mut record, &Submission::new(p0(), Action::CancelStaging { stack: ids[1] }))
        .unwrap();

    let mut loose: Vec<_> = record.loose_cards().map(|lc| lc.card).collect();
    loose.sort();
    assert_eq!(
        loose,
        vec![card(Rank::Three, Suit::Hearts), card(Rank::Four, Suit::Clubs)]
    );
    assert_eq!(record.hand(p0()), &hands_before.0);
    assert_eq!(record.hand(p1()), &hands_before.1);
    assert!(record.capture_pile(p0()).is_empty());
    assert!(record.capture_pile(p1()).is_empty());
}

/// Staging from the opponent's pile top, then cancelling, leaves the
/// withdrawn card loose on the table rather than back in the pile.
#[test]
fn test_pile_sourced_staging_and_cancel() {
    let router = ActionRouter::new(GameConfig::standard());
    let six = card(Rank::Six, Suit::Clubs);
    let mut record = record_with(
        vec![card(Rank::Nine, Suit::Spades)],
        vec![card(Rank::Eight, Suit::Hearts)],
        vec![card(Rank::Three, Suit::Hearts)],
    );
    record.append_to_pile(p1(), six);
    let base = loose_ids(&record)[0];

    router
        .submit(
            &mut record,
            &Submission::new(
                p0(),
                Action::StartStaging {
                    card: six,
                    source: CardSource::OpponentPile,
                    target: base,
                },
            ),
        )
        .unwrap();
    assert!(record.capture_pile(p1()).is_empty());
    assert_eq!(record.stack_of(p0()).unwrap().value(), 9);

    router
        .submit(&mut record, &Submission::new(p0(), Action::CancelStaging { stack: base }))
        .unwrap();
    assert!(record.stack_of(p0()).is_none());
    // The cancelled stack unwinds last-staged first.
    let loose: Vec<_> = record.loose_cards().map(|lc| lc.card).collect();
    assert_eq!(loose, vec![six, card(Rank::Three, Suit::Hearts)]);
    assert!(record.capture_pile(p1()).is_empty());
}
