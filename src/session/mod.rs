pub(crate) mod rig_session;
pub(crate) mod state;
