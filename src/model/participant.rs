// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Simscene and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::ids::ParticipantId;

/// A named device taking part in the simulated protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    participant_id: ParticipantId,
    name: SmolStr,
    shortname: SmolStr,
    address_hex: Option<SmolStr>,
    simulate: bool,
}

impl Participant {
    pub fn new(
        participant_id: ParticipantId,
        name: impl Into<SmolStr>,
        shortname: impl Into<SmolStr>,
    ) -> Self {
        Self {
            participant_id,
            name: name.into(),
            shortname: shortname.into(),
            address_hex: None,
            simulate: false,
        }
    }

    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shortname(&self) -> &str {
        &self.shortname
    }

    pub fn set_name(&mut self, name: impl Into<SmolStr>) {
        self.name = name.into();
    }

    pub fn set_shortname(&mut self, shortname: impl Into<SmolStr>) {
        self.shortname = shortname.into();
    }

    pub fn address_hex(&self) -> Option<&str> {
        self.address_hex.as_deref()
    }

    pub fn set_address_hex<T: Into<SmolStr>>(&mut self, address_hex: Option<T>) {
        self.address_hex = address_hex.map(Into::into);
    }

    pub fn simulate(&self) -> bool {
        self.simulate
    }

    pub fn set_simulate(&mut self, simulate: bool) {
        self.simulate = simulate;
    }

    /// Text shown in the actor's header box: the short name when set, the full name otherwise.
    pub fn display_name(&self) -> &str {
        if self.shortname.is_empty() {
            &self.name
        } else {
            &self.shortname
        }
    }
}
