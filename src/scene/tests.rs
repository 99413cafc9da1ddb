// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use rstest::{fixture, rstest};

use super::{ActorKey, ItemKind, Point, Scene, SceneItemRef, SyncError};
use crate::config::SceneConfig;
use crate::model::fixtures::demo_tree;
use crate::model::{
    ConditionType, NewNode, NodeId, NodeKindTag, ParticipantId, ScriptModel, SimMessage,
    SimulatorTree, TreeError, TreeEvent,
};

struct Doc {
    tree: SimulatorTree,
    scene: Scene,
}

impl Doc {
    fn new(tree: SimulatorTree) -> Self {
        let scene = Scene::with_config(&tree, SceneConfig::default()).expect("scene");
        Self { tree, scene }
    }

    fn pump(&mut self) {
        for event in self.tree.take_events() {
            self.scene.handle_event(&self.tree, &event).expect("sync");
        }
    }

    fn item_of(&self, node_id: NodeId) -> super::VisualItem {
        let item_id = self.scene.item_for_node(node_id).expect("mapped");
        self.scene.item(item_id).expect("item").clone()
    }

    fn nodes_of_kind(&self, tag: NodeKindTag) -> Vec<NodeId> {
        self.tree
            .all_items()
            .into_iter()
            .filter(|node_id| self.tree.node(*node_id).is_some_and(|n| n.kind().tag() == tag))
            .collect()
    }

    fn assert_bijection(&self) {
        let live = self.tree.all_items();
        assert_eq!(self.scene.mapped_len(), live.len());
        assert_eq!(self.scene.item_count(), live.len());

        let mut seen = HashSet::new();
        for node_id in &live {
            let item_id = self.scene.item_for_node(*node_id).expect("every live node is mapped");
            assert!(seen.insert(item_id), "item {item_id} mapped twice");
            assert_eq!(self.scene.item(item_id).map(|i| i.node_id()), Some(*node_id));
        }
        for item in self.scene.items() {
            assert!(self.tree.contains(item.node_id()), "item {} is stale", item.item_id());
        }
    }

    fn assert_parents_mirror_tree(&self) {
        for node_id in self.tree.all_items() {
            let item = self.item_of(node_id);
            let expected = self.tree.parent(node_id).and_then(|p| self.scene.item_for_node(p));
            assert_eq!(item.parent(), expected);
            let children = self
                .tree
                .children(Some(node_id))
                .iter()
                .filter_map(|c| self.scene.item_for_node(*c))
                .collect::<Vec<_>>();
            assert_eq!(item.children(), children.as_slice());
        }
    }
}

#[fixture]
fn demo() -> Doc {
    Doc::new(demo_tree())
}

#[rstest]
fn construction_mirrors_existing_tree(demo: Doc) {
    demo.assert_bijection();
    demo.assert_parents_mirror_tree();
    let top = demo.tree.children(None).iter().filter_map(|n| demo.scene.item_for_node(*n)).collect::<Vec<_>>();
    assert_eq!(demo.scene.top_level(), top.as_slice());
}

#[rstest]
fn numbering_and_captions_follow_tree_positions(demo: Doc) {
    let snapshot = demo.scene.snapshot();
    let rows = snapshot
        .items
        .iter()
        .filter(|item| item.kind != ItemKind::Label)
        .map(|item| (item.index.as_str(), item.text.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            ("1", ""),
            ("2", ""),
            ("2.1", "IF item1.data == 15"),
            ("2.1.1", ""),
            ("2.2", "ELSE"),
            ("2.2.1", "GOTO: 1"),
            ("3", "Start program [notify.sh]"),
        ]
    );
    assert!(snapshot.items.iter().filter(|i| i.kind == ItemKind::Label).all(|i| i.index.is_empty()));
}

#[rstest]
fn demo_layout_places_lanes_and_stacks_items(demo: Doc) {
    let lanes = demo.scene.actors().visible().map(|a| (a.name().to_owned(), a.x())).collect::<Vec<_>>();
    // Request labels form a 211 wide row; B must clear it plus the lane spacing.
    assert_eq!(lanes, vec![("A".to_owned(), 0.0), ("B".to_owned(), 241.0)]);

    let top = demo.scene.top_level().to_vec();
    let ys = top.iter().map(|id| demo.scene.item(*id).expect("item").pos().y).collect::<Vec<_>>();
    assert_eq!(ys, vec![30.0, 68.0, 202.0]);
    assert!(demo.scene.actors().iter().all(|a| a.line_bottom() == 234.0));

    let extent = demo.scene.extent();
    assert!(extent.x <= -10.0);
    assert!(extent.bottom() >= 234.0);
}

#[rstest]
fn hidden_actors_are_pinned_and_synthetic_lanes_exist(demo: Doc) {
    let hidden = demo.scene.actors().iter().filter(|a| !a.is_visible()).collect::<Vec<_>>();
    assert_eq!(hidden.len(), 2);
    assert!(hidden.iter().all(|a| a.is_synthetic() && a.x() == 30.0));
    assert_eq!(demo.scene.actors().get(ActorKey::Unassigned).map(|a| a.name()), Some("?"));
}

#[rstest]
fn endpoint_change_reevaluates_visibility(mut demo: Doc) {
    let request = demo.tree.children(None)[0];
    let broadcast = demo.tree.broadcast().participant_id();
    demo.tree.set_message_endpoints(request, None, broadcast).expect("endpoints");
    demo.pump();

    let visible = demo.scene.actors().visible().map(|a| a.key()).collect::<Vec<_>>();
    assert!(visible.contains(&ActorKey::Unassigned));
    assert!(visible.contains(&ActorKey::Participant(broadcast)));
    assert_eq!(visible.len(), 4, "Bob and Alice still exchange the ack");
}

#[rstest]
fn move_keeps_item_identity_and_selection(mut demo: Doc) {
    let program = demo.tree.children(None)[2];
    let item_before = demo.item_of(program);
    assert!(demo.scene.set_selected(item_before.item_id(), true));

    let rule = demo.tree.children(None)[1];
    let if_branch = demo.tree.children(Some(rule))[0];
    demo.tree.move_items(&[program], 0, Some(if_branch)).expect("move");
    demo.pump();

    let item_after = demo.item_of(program);
    assert_eq!(item_after.item_id(), item_before.item_id());
    assert!(item_after.is_selected());
    assert_eq!(item_after.parent(), demo.scene.item_for_node(if_branch));
    assert_ne!(item_after.pos(), item_before.pos());
    demo.assert_bijection();
    demo.assert_parents_mirror_tree();
}

#[rstest]
fn move_within_parent_reorders_visual_children(mut demo: Doc) {
    let top = demo.tree.children(None).to_vec();
    demo.tree.move_items(&[top[2]], 0, None).expect("move");
    demo.pump();

    demo.assert_parents_mirror_tree();
    let first = demo.scene.top_level()[0];
    assert_eq!(demo.scene.item(first).map(|i| i.index().to_owned()), Some("1".to_owned()));
    assert_eq!(demo.scene.item(first).map(|i| i.kind()), Some(ItemKind::ProgramAction));
}

#[rstest]
fn deleting_a_rule_removes_every_nested_item(mut demo: Doc) {
    let rule = demo.tree.children(None)[1];
    let nested = {
        let mut out = Vec::new();
        let mut stack = vec![rule];
        while let Some(node_id) = stack.pop() {
            out.push(node_id);
            stack.extend_from_slice(demo.tree.children(Some(node_id)));
        }
        out
    };
    let nested_items = nested.iter().filter_map(|n| demo.scene.item_for_node(*n)).collect::<Vec<_>>();
    assert_eq!(nested_items.len(), nested.len());

    demo.tree.delete_items(&[rule]);
    demo.pump();

    for (node_id, item_id) in nested.iter().zip(&nested_items) {
        assert_eq!(demo.scene.item_for_node(*node_id), None);
        assert!(demo.scene.item(*item_id).is_none());
    }
    demo.assert_bijection();
    demo.assert_parents_mirror_tree();
}

#[rstest]
fn added_nodes_bring_their_prebuilt_children(mut demo: Doc) {
    let alice = demo.tree.participants()[0].participant_id();
    let bob = demo.tree.participants()[1].participant_id();
    let message = NewNode::message(SimMessage::new(Some(alice), bob, vec![true; 8], 0, "t"))
        .with_child(NewNode::label(crate::model::FieldLabel::new("a", 0, 4)))
        .with_child(NewNode::label(crate::model::FieldLabel::new("b", 4, 8)));
    let added = demo.tree.add_items(vec![message], 0, None).expect("add");
    demo.pump();

    let item = demo.item_of(added[0]);
    assert_eq!(item.children().len(), 2);
    demo.assert_bijection();
}

#[rstest]
fn mixed_edit_sequence_keeps_bijection(mut demo: Doc) {
    let rule = demo.tree.children(None)[1];
    let added = demo
        .tree
        .add_items(vec![NewNode::condition(ConditionType::ElseIf)], 1, Some(rule))
        .expect("else if");
    demo.pump();

    let messages = demo.nodes_of_kind(NodeKindTag::Message);
    demo.tree.move_items(&messages, 0, Some(added[0])).expect("move");
    demo.pump();
    demo.assert_bijection();
    demo.assert_parents_mirror_tree();

    demo.tree.delete_items(&[added[0]]);
    demo.pump();
    demo.assert_bijection();
    demo.assert_parents_mirror_tree();
    assert!(demo.scene.all_messages().is_empty());
}

#[rstest]
fn refresh_twice_is_idempotent(mut demo: Doc) {
    let first = demo.scene.snapshot();
    demo.scene.update_view(&demo.tree);
    let second = demo.scene.snapshot();

    assert_eq!(second.view_rev, first.view_rev + 1);
    assert_eq!(first.items, second.items);
    assert_eq!(first.actors, second.actors);
    assert_eq!(first.extent, second.extent);
}

#[rstest]
fn missed_add_is_reported_not_swallowed(mut demo: Doc) {
    let added = demo.tree.add_items(vec![NewNode::program_action("x")], 0, None).expect("add");
    // Drop the notification so the scene never sees the node.
    demo.tree.take_events();

    let err = demo
        .scene
        .handle_event(&demo.tree, &TreeEvent::ItemsUpdated(added.clone()))
        .expect_err("unmapped");
    assert_eq!(err, SyncError::UnmappedNode { node_id: added[0] });
    assert_eq!(demo.scene.model_to_scene(None), Ok(None));
}

#[rstest]
fn participants_changes_are_mirrored(mut demo: Doc) {
    let carol = demo.tree.add_participant("Carol", "");
    demo.pump();
    let names = demo.scene.actors().iter().map(|a| a.name().to_owned()).collect::<Vec<_>>();
    assert_eq!(names, vec!["A", "B", "Carol", "?", "Broadcast"]);
    assert!(!demo.scene.actors().get(ActorKey::Participant(carol)).expect("carol").is_visible());

    let bob = demo.tree.participants()[1].participant_id();
    demo.tree.remove_participant(bob).expect("remove");
    demo.pump();
    assert!(demo.scene.actors().get(ActorKey::Participant(bob)).is_none());
    // Messages to Bob now go to broadcast, so its lane shows up.
    let broadcast = demo.tree.broadcast().participant_id();
    assert!(demo.scene.actors().get(ActorKey::Participant(broadcast)).expect("broadcast").is_visible());
}

#[rstest]
fn renamed_participant_refreshes_its_actor(mut demo: Doc) {
    let alice = demo.tree.participants()[0].participant_id();
    let key = ActorKey::Participant(alice);
    let before = demo.scene.actors().get(key).expect("alice").header_rect().width;

    demo.tree.rename_participant(alice, "Alice", "Alpha").expect("rename");
    assert_eq!(demo.tree.take_events(), vec![TreeEvent::ParticipantsChanged]);
    demo.scene.handle_event(&demo.tree, &TreeEvent::ParticipantsChanged).expect("sync");

    let actor = demo.scene.actors().get(key).expect("alice");
    assert_eq!(actor.name(), "Alpha");
    assert_eq!(actor.header_rect().width, before + 4.0 * 7.0);
    assert_eq!(demo.scene.actors().len(), 4);

    let missing = ParticipantId::new(99);
    assert_eq!(
        demo.tree.rename_participant(missing, "Ghost", ""),
        Err(TreeError::UnknownParticipant { participant_id: missing })
    );
}

#[test]
fn lanes_widen_for_messages_between_them() {
    let mut tree = SimulatorTree::new();
    let a = tree.add_participant("A", "");
    let b = tree.add_participant("B", "");
    let c = tree.add_participant("C", "");
    tree.add_items(
        vec![
            NewNode::message(SimMessage::new(Some(a), b, vec![], 0, "t")),
            NewNode::message(SimMessage::new(Some(b), c, vec![], 0, "t")),
        ],
        0,
        None,
    )
    .expect("messages");
    tree.take_events();
    let doc = Doc::new(tree);

    let xs = doc.scene.actors().visible().map(|actor| actor.x()).collect::<Vec<_>>();
    // Label-less messages measure the 40 unit minimum; headers are 23 wide.
    assert_eq!(xs, vec![0.0, 70.0, 140.0]);
    assert!(xs[1] >= (23.0 + 10.0_f64).max(40.0 + 30.0));
    assert!(xs[2] >= (xs[1] + 23.0 + 10.0).max(xs[1] + 40.0 + 30.0));
}

#[test]
fn empty_script_hides_every_actor() {
    let doc = Doc::new(SimulatorTree::new());
    assert!(doc.scene.top_level().is_empty());
    assert_eq!(doc.scene.actors().visible().count(), 0);
    assert!(doc.scene.actors().iter().all(|a| a.x() == 30.0 && a.line_bottom() == 50.0));
}

#[test]
fn single_visible_lane_sits_at_origin() {
    let mut tree = SimulatorTree::new();
    let a = tree.add_participant("A", "");
    tree.add_items(vec![NewNode::message(SimMessage::new(Some(a), a, vec![], 0, "t"))], 0, None)
        .expect("message");
    tree.take_events();
    let doc = Doc::new(tree);

    let visible = doc.scene.actors().visible().map(|a| (a.key(), a.x())).collect::<Vec<_>>();
    assert_eq!(visible, vec![(ActorKey::Participant(a), 0.0)]);
}

#[test]
fn unassigned_sender_gets_its_own_lane() {
    let mut tree = SimulatorTree::new();
    let broadcast = tree.broadcast().participant_id();
    tree.add_items(vec![NewNode::message(SimMessage::new(None, broadcast, vec![], 0, "t"))], 0, None)
        .expect("message");
    tree.take_events();
    let doc = Doc::new(tree);

    // "?" is 23 wide, "Broadcast" 79: the 40 unit message wins over header clearance (61).
    let visible = doc.scene.actors().visible().map(|a| (a.key(), a.x())).collect::<Vec<_>>();
    assert_eq!(visible, vec![(ActorKey::Unassigned, 0.0), (ActorKey::Participant(broadcast), 70.0)]);
}

#[rstest]
fn hit_testing_returns_deepest_items_first(demo: Doc) {
    let hits = demo.scene.items_at(Point::new(100.0, 110.0));
    let kinds = hits
        .iter()
        .filter_map(|hit| match hit {
            SceneItemRef::Content(item_id) => demo.scene.item(*item_id).map(|i| i.kind()),
            SceneItemRef::Actor(_) => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec![ItemKind::Label, ItemKind::Message, ItemKind::RuleCondition, ItemKind::Rule]);

    let header = demo.scene.items_at(Point::new(0.0, 5.0));
    assert!(header.iter().any(|hit| matches!(hit, SceneItemRef::Actor(_))));
}

#[rstest]
fn select_all_skips_unselectable_kinds(mut demo: Doc) {
    demo.scene.select_all_items();
    let selected = demo.scene.selected_items();
    assert_eq!(selected, demo.scene.selectable_items());
    assert!(selected
        .iter()
        .filter_map(|id| demo.scene.item(*id))
        .all(|item| !matches!(item.kind(), ItemKind::Rule | ItemKind::Label)));
    demo.scene.clear_selection();
    assert!(demo.scene.selected_items().is_empty());
}
