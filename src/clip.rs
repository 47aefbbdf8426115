//! The clip driver: walks groups in back-to-front render order and removes
//! visible overlap between coplanar polygons by splitting and deletion.

use crate::errors::ClipError;
use crate::mesh::group::Group;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::VertexArray;
use tracing::{Level, debug, enabled, trace, warn};

/// Split budget for one back group against all of its front groups.
/// Exhausting it fails the whole [`clip_polygons`] call.
pub const MAX_SPLITS: u32 = 1024;

/// Outcome of one equal/contains/clip step against the current front.
enum Step {
    /// The back polygon is completely occluded and must be deleted.
    Covered,
    /// No further subdivision against this front polygon.
    Done,
    /// The back polygon was split; the cut-off piece needs inserting.
    Split(Polygon),
}

/// Clip every group of polygons against the polygons in front of it.
///
/// `order` lists group indices back-to-front; within a group, position is
/// the render order (earlier is rearward). Rearward polygons that overlap a
/// coplanar polygon in front of them are subdivided along the front
/// polygon's edges, and pieces that end up fully covered are deleted.
///
/// The operation mutates `arena` (splits add vertices) and `groups` in
/// place. On error the containers are left in an intermediate but
/// internally consistent state; the caller must discard the computation.
pub fn clip_polygons(
    arena: &mut VertexArray,
    groups: &mut [Group],
    order: &[usize],
) -> Result<(), ClipError> {
    for bg in 0..order.len() {
        clip_group(arena, groups, order, bg)?;
    }
    Ok(())
}

/// Clip one group (selected by render-order position `bg`) against any
/// polygons in front of its polygons.
fn clip_group(
    arena: &mut VertexArray,
    groups: &mut [Group],
    order: &[usize],
    bg: usize,
) -> Result<(), ClipError> {
    let back_group = order[bg];
    trace!(group = back_group, "clipping back group");

    let mut nsplit = 0;
    let mut ndel = 0;

    let mut back = 0;
    while back < groups[back_group].len() {
        let mut deleted = false;

        // Coplanar polygons later in the same group are in front.
        clip_group_vs_group(
            arena, groups, back_group, back, back_group, back + 1, &mut nsplit, &mut deleted,
        )?;

        // Then the groups that follow in the render order.
        for fg in bg + 1..order.len() {
            if deleted {
                break;
            }
            if order[fg] == back_group {
                // The same-group pass already covered this pairing.
                continue;
            }
            clip_group_vs_group(
                arena, groups, back_group, back, order[fg], 0, &mut nsplit, &mut deleted,
            )?;
        }

        if deleted {
            // The position now holds the deleted polygon's successor, so
            // the cursor stays put.
            ndel += 1;
        } else {
            back += 1;
        }
    }

    if nsplit > 0 || ndel > 0 {
        debug!(
            splits = nsplit,
            deleted = ndel,
            group = back_group,
            "finished clipping group"
        );
    }
    Ok(())
}

/// Clip the polygon at `(bg, back)` against the polygons of group `fg`
/// starting at `front_start`. Sets `deleted` (and stops) if the back
/// polygon was deleted.
#[allow(clippy::too_many_arguments)]
fn clip_group_vs_group(
    arena: &mut VertexArray,
    groups: &mut [Group],
    bg: usize,
    back: usize,
    fg: usize,
    front_start: usize,
    nsplit: &mut u32,
    deleted: &mut bool,
) -> Result<(), ClipError> {
    debug_assert!(!*deleted);

    // The 2D plane in which to clip; a back polygon that is a point or a
    // line has none and there is nothing to do.
    let Some(plane) = groups[bg]
        .get(back)
        .and_then(|backp| backp.find_plane(arena))
    else {
        return Ok(());
    };

    let mut front = front_start;
    while front < groups[fg].len() {
        if groups[fg].get(front).map_or(true, |f| f.num_sides() < 3) {
            // Can't clip against a point or line.
            front += 1;
            continue;
        }

        {
            let (backp, frontp) = back_and_front(groups, bg, back, fg, front);
            if !frontp.coplanar(backp, arena) {
                front += 1;
                continue;
            }
        }

        let mut covered = false;
        loop {
            let step = {
                let (backp, frontp) = back_and_front(groups, bg, back, fg, front);
                if frontp.same_cycle(backp) || frontp.contains(backp, arena, plane) {
                    Step::Covered
                } else {
                    match backp.clip(frontp, arena, plane) {
                        Ok(Some(piece)) => Step::Split(piece),
                        Ok(None) => Step::Done,
                        Err(e) => {
                            debug!("clipping failed: {e}");
                            return Err(e.into());
                        }
                    }
                }
            };

            match step {
                Step::Covered => {
                    covered = true;
                    break;
                }
                Step::Done => break,
                Step::Split(piece) => {
                    groups[bg].insert(back + 1, piece);

                    *nsplit += 1;
                    if *nsplit == MAX_SPLITS {
                        warn!(splits = *nsplit, "aborted polygon clipping");
                        return Err(ClipError::TooManySplits(*nsplit));
                    }

                    // The insertion shifted every polygon after `back` in
                    // the back group up by one, including the front polygon
                    // when both live in the same group.
                    if fg == bg {
                        front += 1;
                    }

                    if enabled!(Level::DEBUG) {
                        let frontp = &groups[fg].polygons()[front];
                        let front_id = frontp.id();
                        let backp = &groups[bg].polygons()[back];
                        let piece = &groups[bg].polygons()[back + 1];
                        debug!(
                            "split polygon {} in group {bg} behind {front_id} in group {fg}:\n{}\n and\n{}",
                            backp.id(),
                            backp.describe(arena),
                            piece.describe(arena),
                        );
                    }
                }
            }
        }

        if covered {
            // Announce the deletion while the polygon is still printable.
            if enabled!(Level::DEBUG) {
                let frontp = &groups[fg].polygons()[front];
                let front_id = frontp.id();
                let backp = &groups[bg].polygons()[back];
                debug!(
                    "deleting polygon {} in group {bg} behind {front_id} in group {fg}:\n{}",
                    backp.id(),
                    backp.describe(arena),
                );
            }
            groups[bg].delete(back);
            *deleted = true;
            break;
        }

        front += 1;
    }

    Ok(())
}

/// Disjoint borrows of the back (mutable) and front (shared) polygons.
///
/// The groups slice owns both, so the pair is carved out with
/// `split_at_mut`; within one group the front always follows the back.
fn back_and_front<'a>(
    groups: &'a mut [Group],
    bg: usize,
    back: usize,
    fg: usize,
    front: usize,
) -> (&'a mut Polygon, &'a Polygon) {
    if bg == fg {
        debug_assert!(back < front);
        let (left, right) = groups[bg].polygons_mut().split_at_mut(front);
        (&mut left[back], &right[0])
    } else if bg < fg {
        let (left, right) = groups.split_at_mut(fg);
        (&mut left[bg].polygons_mut()[back], &right[0].polygons()[front])
    } else {
        let (left, right) = groups.split_at_mut(bg);
        (&mut right[0].polygons_mut()[back], &left[fg].polygons()[front])
    }
}
