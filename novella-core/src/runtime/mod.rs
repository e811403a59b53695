mod ctx;

pub use ctx::{Ctx, DialogueRecord, GLOBAL_VAR_COUNT, LOCAL_VAR_COUNT, NAME_VAR_RANGE, VAR_COUNT};
