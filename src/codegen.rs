//! Replay program synthesis
//!
//! Emits a standalone, dependency-free C program that re-creates a bounded
//! approximation of the live set: allocate in selection order, touch each
//! block so the pages are physically resident, hold everything long enough
//! for an external snapshot poller to sample the process, then free in
//! allocation order and exit. Any allocation failure aborts immediately
//! with a non-zero status; a partial, leaking replay would corrupt the
//! footprint comparison. This module only produces text; compiling and
//! running the result is the orchestrator's job.

use crate::selection::ReplayEntry;

/// Bytes written with the touch pattern per block (whole block if smaller).
/// An untouched block may never be backed by real memory.
const TOUCH_BYTES: u64 = 4096;

/// Seconds the replay holds its blocks for the snapshot poller
const HOLD_SECONDS: u64 = 8;

/// Sum of the sizes the emitted program will request, for cross-checking
/// against the selection.
pub fn total_requested_bytes(selection: &[ReplayEntry]) -> u64 {
    selection
        .iter()
        .map(|entry| entry.size_bytes)
        .fold(0, u64::saturating_add)
}

/// Emit replay program source for one selection.
pub fn emit_replay_source(selection: &[ReplayEntry]) -> String {
    let mut src = String::new();
    src.push_str("/* Auto-generated safe replay program */\n");
    src.push_str("#include <stdlib.h>\n");
    src.push_str("#include <stdio.h>\n");
    src.push_str("#include <unistd.h>\n");
    src.push_str("#include <string.h>\n");
    src.push_str("#include <stdint.h>\n");
    src.push_str("#include <time.h>\n");
    src.push_str("\nint main(void) {\n");
    src.push_str(&format!("    size_t n = {};\n", selection.len()));
    // malloc(0) may legally return NULL; keep the pointer table non-empty
    src.push_str("    void **arr = malloc((n ? n : 1) * sizeof(void*));\n");
    src.push_str("    if (!arr) { perror(\"malloc\"); return 1; }\n");
    src.push_str("    size_t i = 0;\n");

    for entry in selection {
        let touch = entry.size_bytes.min(TOUCH_BYTES);
        src.push_str(&format!(
            "    arr[i] = malloc({}); if (!arr[i]) {{ perror(\"malloc\"); return 1; }}\n",
            entry.size_bytes
        ));
        src.push_str(&format!("    memset(arr[i], 0xAB, {});\n", touch));
        src.push_str("    i++;\n");
    }

    src.push_str(&format!(
        "    printf(\"[replay] Allocated %zu objects, holding for {}s\\n\", (size_t)i);\n",
        HOLD_SECONDS
    ));
    src.push_str("    fflush(stdout);\n");
    src.push_str(&format!(
        "    struct timespec ts = {{{}, 0}}; nanosleep(&ts, NULL);\n",
        HOLD_SECONDS
    ));
    src.push_str("    for (size_t j = 0; j < i; j++) { free(arr[j]); }\n");
    src.push_str("    free(arr);\n");
    src.push_str("    printf(\"[replay] Freed and exiting\\n\"); fflush(stdout);\n");
    src.push_str("    return 0;\n");
    src.push_str("}\n");
    src
}
