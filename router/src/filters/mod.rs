mod catch;
mod trace;

pub use self::{
    catch::{CatchAll, CatchAllHandler, catch_all, catch_all_with},
    trace::{Trace, TraceHandler, trace},
};
