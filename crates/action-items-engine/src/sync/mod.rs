/*!
 * # Action Item Synchronization
 *
 * Marker lines (`// call bob`) can sit anywhere in a document. This module
 * keeps a summary section at the top of the document in step with them:
 *
 * ```text
 * # Action Items
 * - call bob
 *
 * ...
 * // call bob
 * ```
 *
 * ## Control Flow
 *
 * 1. **Edit notification**: the change gate looks at the caret line and
 *    picks a route: immediate (marker line or a tracked former marker),
 *    line start (caret near column 0), or throttled (everything else, at
 *    most once per throttle window)
 * 2. **Typing guard**: a caret line holding a half-typed prefix is left
 *    alone so the caret does not jump mid-keystroke
 * 3. **Collect**: scan every line, build one bullet per non-empty marker
 *    payload, and splice them into the managed section (or prepend one)
 * 4. **Restore**: remap the caret by the section's size change, clamp it,
 *    restore the scroll offset, and rebuild the tracked marker lines
 *
 * When no action items remain, the section is deleted instead.
 *
 * ## Module Structure
 *
 * - **`marker`**: marker line classification and payload extraction
 * - **`tracker`**: tracked marker line indices
 * - **`gate`**: route decision and throttle window
 * - **`section`**: pure line algorithms (scan, find, merge, remove)
 * - **`cursor`**: caret remapping and clamping
 * - **`synchronizer`**: `Synchronizer`, event dispatch and outcomes
 */

pub mod cursor;
pub mod gate;
pub mod marker;
pub mod section;
pub mod synchronizer;
pub mod tracker;

pub use gate::Route;
pub use marker::{MarkerClassifier, is_marker_line};
pub use section::SectionSpan;
pub use synchronizer::{
    CollectOutcome, Dispatched, EditOutcome, HostEvent, SuppressReason, SyncError, Synchronizer,
};
pub use tracker::MarkerTracker;
