use std::sync::Arc;

use numbering_core::Sequencer;
use numbering_guid::GuidGenerator;

#[derive(Clone)]
pub struct AppState {
    guid: Arc<GuidGenerator>,
    sequencer: Arc<dyn Sequencer>,
}

impl AppState {
    pub fn new(guid: Arc<GuidGenerator>, sequencer: Arc<dyn Sequencer>) -> Self {
        Self { guid, sequencer }
    }

    pub fn guid(&self) -> &GuidGenerator {
        &self.guid
    }

    pub fn sequencer(&self) -> &dyn Sequencer {
        self.sequencer.as_ref()
    }
}
