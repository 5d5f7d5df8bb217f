//! PMU_B01 message structure (chapter 15, add personnel record).

use crate::Segment;

crate::hl7_structure! {
    /// Represents a PMU_B01 message structure. Contains the following
    /// elements:
    ///
    /// 0. MSH (Message Header)
    /// 1. EVN (Event Type)
    /// 2. STF (Staff Identification)
    /// 3. PRA (Practitioner Detail) optional repeating
    /// 4. ORG (Practitioner Organization Unit) optional repeating
    /// 5. AFF (Professional Affiliation) optional repeating
    /// 6. LAN (Language Detail) optional repeating
    /// 7. EDU (Educational Detail) optional repeating
    pub struct PmuB01("PMU_B01") {
        "MSH": Segment, required, single { get: msh },
        "EVN": Segment, required, single { get: evn },
        "STF": Segment, required, single { get: stf },
        "PRA": Segment, optional, repeating {
            get: pra,
            rep: pra_rep,
            count: pra_reps_used,
            iter: pras,
            add: add_pra,
            remove: remove_pra,
            remove_at: remove_pra_at,
        },
        "ORG": Segment, optional, repeating {
            get: org,
            rep: org_rep,
            count: org_reps_used,
            iter: orgs,
            add: add_org,
            remove: remove_org,
            remove_at: remove_org_at,
        },
        "AFF": Segment, optional, repeating {
            get: aff,
            rep: aff_rep,
            count: aff_reps_used,
            iter: affs,
            add: add_aff,
            remove: remove_aff,
            remove_at: remove_aff_at,
        },
        "LAN": Segment, optional, repeating {
            get: lan,
            rep: lan_rep,
            count: lan_reps_used,
            iter: lans,
            add: add_lan,
            remove: remove_lan,
            remove_at: remove_lan_at,
        },
        "EDU": Segment, optional, repeating {
            get: edu,
            rep: edu_rep,
            count: edu_reps_used,
            iter: edus,
            add: add_edu,
            remove: remove_edu,
            remove_at: remove_edu_at,
        },
    }
}

impl PmuB01 {
    /// HL7 version of this message structure.
    pub const VERSION: &'static str = super::VERSION;
}
