// assembles solved placements into the two-level controller hierarchy
//
//   object -> local controller -> global controller -> rig root
//
// the local controller carries the element's distance offset, the global
// controller carries orbit rotation plus a uniform scale equal to the
// distance, so scaling it later re-derives an effective distance

use std::f32::consts::FRAC_PI_2;

use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::Transform;

use crate::config;
use crate::systems::GenError;

use super::placement::{LightPlacement, RigPlacement};
use super::scene_graph::{NodeId, NodeKind, SceneGraph};

#[derive(Clone, Copy, Debug)]
pub struct BranchHandles {
    pub object: NodeId,
    pub local_ctrl: NodeId,
    pub global_ctrl: NodeId,
}

// typed handle map returned to callers, replaces name re-resolution
// also remembers every node's canonical local transform for Reset
#[derive(Clone, Debug)]
pub struct RigHandles {
    pub root: NodeId,
    pub camera: BranchHandles,
    pub backdrop: BranchHandles,
    pub key: BranchHandles,
    pub fill: BranchHandles,
    pub back: BranchHandles,
    canonical: Vec<(NodeId, String, Transform)>,
}

impl RigHandles {
    pub fn branches(&self) -> [BranchHandles; 5] {
        [self.camera, self.backdrop, self.key, self.fill, self.back]
    }
}

// shape of one branch before assembly
struct BranchSpec {
    name: &'static str,
    kind: NodeKind,
    object_rotation: Quat,
    object_scale: f32,
    offset: Vec3,      // local controller offset from the subject
    global_scale: f32, // uniform, equals the element's distance
    yaw: f32,
    pitch: f32,
}

fn light_spec(name: &'static str, light: &LightPlacement) -> BranchSpec {
    BranchSpec {
        name,
        kind: NodeKind::AreaLight,
        // area lights aim sideways at the subject
        object_rotation: Quat::from_rotation_y(FRAC_PI_2),
        object_scale: light.scale,
        offset: Vec3::new(light.distance, 0.0, 0.0),
        global_scale: light.distance,
        yaw: light.yaw,
        pitch: light.pitch,
    }
}

// construct the whole rig in one pass
// all-or-nothing: the duplicate check runs before the first node is spawned
pub fn build(
    graph: &mut SceneGraph,
    placement: &RigPlacement,
    subject_pos: Vec3,
) -> Result<RigHandles, GenError> {
    if graph.find(config::RIG_ROOT_NAME).is_some() {
        return Err(GenError::DuplicateRig(config::RIG_ROOT_NAME.into()));
    }

    let camera = placement.camera;
    let specs = [
        BranchSpec {
            name: config::CAMERA_NAME,
            kind: NodeKind::Camera,
            // base yaw 90 deg, base pitch 90 deg minus the tilt compensation
            object_rotation: Quat::from_euler(EulerRot::ZYX, FRAC_PI_2, 0.0, camera.pitch),
            object_scale: camera.scale,
            offset: Vec3::new(camera.distance, 0.0, camera.lift),
            global_scale: camera.distance,
            yaw: 0.0,
            pitch: 0.0,
        },
        BranchSpec {
            name: config::BACKDROP_NAME,
            kind: NodeKind::Backdrop,
            object_rotation: Quat::IDENTITY,
            object_scale: 1.0, // size is baked into the backdrop mesh
            offset: Vec3::new(0.0, 0.0, -placement.backdrop.drop),
            global_scale: 1.0,
            yaw: 0.0,
            pitch: 0.0,
        },
        light_spec(config::KEY_LIGHT_NAME, &placement.key),
        light_spec(config::FILL_LIGHT_NAME, &placement.fill),
        light_spec(config::BACK_LIGHT_NAME, &placement.back),
    ];

    let root = graph.spawn(
        config::RIG_ROOT_NAME,
        NodeKind::Empty,
        Transform::from_translation(subject_pos),
    );

    let mut branches = Vec::with_capacity(specs.len());
    for spec in &specs {
        branches.push(build_branch(graph, spec, subject_pos, root)?);
    }
    let [camera, backdrop, key, fill, back] = branches.try_into().expect("five branches");

    let mut handles = RigHandles {
        root,
        camera,
        backdrop,
        key,
        fill,
        back,
        canonical: Vec::new(),
    };

    // snapshot canonical locals after full assembly, Reset replays these
    let mut ids = vec![handles.root];
    for branch in handles.branches() {
        ids.extend([branch.object, branch.local_ctrl, branch.global_ctrl]);
    }
    for id in ids {
        let node = graph.get(id).expect("freshly built node");
        handles
            .canonical
            .push((id, node.name.clone(), node.local()));
    }

    Ok(handles)
}

fn build_branch(
    graph: &mut SceneGraph,
    spec: &BranchSpec,
    subject_pos: Vec3,
    root: NodeId,
) -> Result<BranchHandles, GenError> {
    // the object starts on the subject, aimed and scaled
    let object = graph.spawn(
        spec.name,
        spec.kind,
        Transform {
            translation: subject_pos,
            rotation: spec.object_rotation,
            scale: Vec3::splat(spec.object_scale),
        },
    );

    // local controller picks the object up, then slides out by the distance
    let local_ctrl = graph.spawn(
        format!("{}{}", spec.name, config::LOCAL_CTRL_SUFFIX),
        NodeKind::CurveProxy,
        Transform::from_translation(subject_pos),
    );
    graph.parent_keep_transform(object, local_ctrl)?;
    graph.set_local(local_ctrl, Transform::from_translation(subject_pos + spec.offset))?;

    // global controller owns orbit rotation and the distance-as-scale
    let global_ctrl = graph.spawn(
        format!("{}{}", spec.name, config::GLOBAL_CTRL_SUFFIX),
        NodeKind::CurveProxy,
        Transform {
            translation: subject_pos,
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(spec.global_scale),
        },
    );
    graph.parent_keep_transform(local_ctrl, global_ctrl)?;
    graph.set_local(
        global_ctrl,
        Transform {
            translation: subject_pos,
            rotation: Quat::from_euler(EulerRot::ZYX, spec.yaw, spec.pitch, 0.0),
            scale: Vec3::splat(spec.global_scale),
        },
    )?;

    graph.parent_keep_transform(global_ctrl, root)?;

    // controllers stay editable, the object itself does not
    graph.lock(object)?;

    Ok(BranchHandles {
        object,
        local_ctrl,
        global_ctrl,
    })
}

// overwrite every rig node with its canonical local transform
// no geometry is consulted, so this is idempotent by construction
pub fn reset(graph: &mut SceneGraph, handles: &RigHandles) -> Result<(), GenError> {
    for (id, name, _) in &handles.canonical {
        if !graph.contains(*id) {
            return Err(GenError::MissingController(name.clone()));
        }
    }
    for (id, _, local) in &handles.canonical {
        graph.set_local(*id, *local)?;
    }
    Ok(())
}

// atomically delete the root and all three levels below it
pub fn clear(graph: &mut SceneGraph, handles: &RigHandles) -> Result<usize, GenError> {
    if !graph.contains(handles.root) {
        return Err(GenError::MissingController(config::RIG_ROOT_NAME.into()));
    }
    graph.delete_subtree(handles.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::rig::bounds::BoundingBox;
    use crate::systems::rig::placement;

    fn solved() -> RigPlacement {
        placement::solve(&BoundingBox {
            min: Vec3::new(-3.0, -2.0, 0.0),
            max: Vec3::new(3.0, 2.0, 10.0),
        })
        .unwrap()
    }

    fn world_pos(graph: &SceneGraph, id: NodeId) -> Vec3 {
        graph.get(id).unwrap().world().translation.into()
    }

    #[test]
    fn builds_sixteen_nodes_in_three_levels() {
        let mut graph = SceneGraph::new();
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();

        assert_eq!(graph.len(), 16);
        let root = graph.get(handles.root).unwrap();
        assert_eq!(root.children().len(), 5);
        for branch in handles.branches() {
            assert_eq!(
                graph.get(branch.object).unwrap().parent(),
                Some(branch.local_ctrl)
            );
            assert_eq!(
                graph.get(branch.local_ctrl).unwrap().parent(),
                Some(branch.global_ctrl)
            );
            assert_eq!(
                graph.get(branch.global_ctrl).unwrap().parent(),
                Some(handles.root)
            );
            assert!(graph.get(branch.object).unwrap().locked());
        }
        assert_eq!(graph.find(crate::config::RIG_ROOT_NAME), Some(handles.root));
        assert_eq!(graph.find("Key Light Global Controller"), Some(handles.key.global_ctrl));
    }

    #[test]
    fn key_light_orbits_to_minus_45_degrees() {
        let mut graph = SceneGraph::new();
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();

        // distance 30 swung by the global yaw of -45 degrees
        let pos = world_pos(&graph, handles.key.object);
        let expected = 30.0 / 2.0_f32.sqrt();
        assert!((pos.x - expected).abs() < 1e-3);
        assert!((pos.y + expected).abs() < 1e-3);
        assert!(pos.z.abs() < 1e-3);
    }

    #[test]
    fn camera_sits_out_front_with_lift() {
        let mut graph = SceneGraph::new();
        let subject = Vec3::new(2.0, 1.0, 0.5);
        let handles = build(&mut graph, &solved(), subject).unwrap();

        let pos = world_pos(&graph, handles.camera.object);
        let expected = subject + Vec3::new(30.0, 0.0, 10.0 / 3.0);
        assert!((pos - expected).length() < 1e-3);
    }

    #[test]
    fn backdrop_drops_below_the_subject() {
        let mut graph = SceneGraph::new();
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        let pos = world_pos(&graph, handles.backdrop.object);
        assert!((pos.z + 6.0).abs() < 1e-4); // height/2 + height/10
    }

    #[test]
    fn second_build_fails_and_mutates_nothing() {
        let mut graph = SceneGraph::new();
        build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        let before = graph.len();

        let err = build(&mut graph, &solved(), Vec3::ZERO).unwrap_err();
        assert!(matches!(err, GenError::DuplicateRig(_)));
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn reset_restores_canonical_state_and_is_idempotent() {
        let mut graph = SceneGraph::new();
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        let canonical_pos = world_pos(&graph, handles.key.object);

        // user drags the key light's global controller around
        let mut edited = graph.get(handles.key.global_ctrl).unwrap().local();
        edited.rotation = Quat::from_rotation_z(1.0);
        edited.scale = Vec3::splat(99.0);
        graph.edit_local(handles.key.global_ctrl, edited).unwrap();
        assert!((world_pos(&graph, handles.key.object) - canonical_pos).length() > 1.0);

        reset(&mut graph, &handles).unwrap();
        let once = world_pos(&graph, handles.key.object);
        reset(&mut graph, &handles).unwrap();
        let twice = world_pos(&graph, handles.key.object);

        assert!((once - canonical_pos).length() < 1e-4);
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_after_partial_deletion_is_refused() {
        let mut graph = SceneGraph::new();
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        graph.delete_subtree(handles.fill.global_ctrl).unwrap();

        let err = reset(&mut graph, &handles).unwrap_err();
        assert!(matches!(err, GenError::MissingController(_)));
    }

    #[test]
    fn clear_removes_the_rig_and_only_the_rig() {
        let mut graph = SceneGraph::new();
        let bystander = graph.spawn("Subject", NodeKind::Empty, Transform::IDENTITY);
        let handles = build(&mut graph, &solved(), Vec3::ZERO).unwrap();

        assert_eq!(clear(&mut graph, &handles).unwrap(), 16);
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(bystander));
        assert!(matches!(
            clear(&mut graph, &handles),
            Err(GenError::MissingController(_))
        ));
    }

    #[test]
    fn rebuild_after_clear_is_bit_identical() {
        let mut graph = SceneGraph::new();
        let first = build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        let first_locals: Vec<Transform> = first
            .canonical
            .iter()
            .map(|(_, _, local)| *local)
            .collect();
        clear(&mut graph, &first).unwrap();

        let second = build(&mut graph, &solved(), Vec3::ZERO).unwrap();
        let second_locals: Vec<Transform> = second
            .canonical
            .iter()
            .map(|(_, _, local)| *local)
            .collect();
        assert_eq!(first_locals, second_locals);
    }
}
