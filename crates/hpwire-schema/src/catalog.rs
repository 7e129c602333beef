//! Declarative payload schemas.
//!
//! Each schema names the root element, its attributes, and the child elements
//! it may contain. Text content is always permitted and never inspected.
//! Attribute and element names follow the scanner's XML exactly.

use hpwire_frame::{GltSubtype, MessageKind};

/// How often a child element may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    /// Exactly once.
    Required,
    /// At most once.
    Optional,
    /// Any number of times.
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSpec {
    pub element: ElementSpec,
    pub occurs: Occurs,
}

/// Expected shape of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpec {
    pub name: &'static str,
    pub attributes: &'static [AttrSpec],
    pub children: &'static [ChildSpec],
}

impl ElementSpec {
    pub fn attribute(&self, name: &str) -> Option<&AttrSpec> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&ChildSpec> {
        self.children.iter().find(|child| child.element.name == name)
    }
}

const fn req(name: &'static str) -> AttrSpec {
    AttrSpec {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> AttrSpec {
    AttrSpec {
        name,
        required: false,
    }
}

const fn leaf(name: &'static str, attributes: &'static [AttrSpec]) -> ElementSpec {
    ElementSpec {
        name,
        attributes,
        children: &[],
    }
}

const fn one(element: ElementSpec) -> ChildSpec {
    ChildSpec {
        element,
        occurs: Occurs::Required,
    }
}

const fn maybe(element: ElementSpec) -> ChildSpec {
    ChildSpec {
        element,
        occurs: Occurs::Optional,
    }
}

const fn many(element: ElementSpec) -> ChildSpec {
    ChildSpec {
        element,
        occurs: Occurs::Repeated,
    }
}

/// Trailer closing every list response: block number and end-of-transfer flag.
const FOOTER: ElementSpec = leaf("Footer", &[req("No"), req("EOT")]);

/// `GLT` list response: repeated entry elements then a footer.
macro_rules! glt_list {
    ($entry:expr) => {
        ElementSpec {
            name: "GLT",
            attributes: &[],
            children: &[many($entry), one(FOOTER)],
        }
    };
}

/// `GSI` / `PSI`: current scanner state.
pub static SCANNER_INFO: ElementSpec = ElementSpec {
    name: "ScannerInfo",
    attributes: &[req("Mode"), req("V_Screen")],
    children: &[
        maybe(leaf(
            "MonitorList",
            &[
                opt("Name"),
                opt("Index"),
                opt("ListType"),
                opt("Q_Key"),
                opt("N_Tag"),
                opt("DB_Counter"),
            ],
        )),
        maybe(leaf(
            "System",
            &[
                opt("Name"),
                opt("Index"),
                opt("Avoid"),
                opt("SystemType"),
                opt("Q_Key"),
                opt("N_Tag"),
                opt("Hold"),
            ],
        )),
        maybe(leaf(
            "Department",
            &[
                opt("Name"),
                opt("Index"),
                opt("Avoid"),
                opt("Q_Key"),
                opt("Hold"),
            ],
        )),
        maybe(leaf(
            "TGID",
            &[
                opt("Name"),
                opt("Index"),
                opt("Avoid"),
                opt("TGID"),
                opt("SetSlot"),
                opt("RecSlot"),
                opt("N_Tag"),
                opt("Hold"),
                opt("SvcType"),
                opt("P_Ch"),
                opt("LVL"),
            ],
        )),
        maybe(leaf("UnitID", &[opt("Name"), opt("U_Id")])),
        maybe(leaf(
            "Site",
            &[
                opt("Name"),
                opt("Index"),
                opt("Avoid"),
                opt("Q_Key"),
                opt("Hold"),
                opt("Mod"),
            ],
        )),
        maybe(leaf(
            "SiteFrequency",
            &[opt("Freq"), opt("IFX"), opt("SAS"), opt("SAD")],
        )),
        maybe(leaf("DualWatch", &[opt("PRI"), opt("CC"), opt("WX")])),
        maybe(leaf(
            "TrunkingDiscovery",
            &[
                opt("SystemName"),
                opt("SiteName"),
                opt("TGID"),
                opt("TgidName"),
                opt("SAD"),
                opt("RecSlot"),
                opt("PastTime"),
                opt("HitCount"),
                opt("U_Id"),
            ],
        )),
        one(leaf(
            "Property",
            &[
                opt("F"),
                opt("VOL"),
                opt("SQL"),
                opt("Sig"),
                opt("Att"),
                opt("Rec"),
                opt("KeyLock"),
                opt("P25Status"),
                opt("Mute"),
                opt("Backlight"),
                opt("A_Led"),
                opt("Dir"),
                opt("Rssi"),
            ],
        )),
        maybe(ElementSpec {
            name: "ViewDescription",
            attributes: &[],
            children: &[
                many(leaf("PlainText", &[opt("Text")])),
                maybe(ElementSpec {
                    name: "PopupScreen",
                    attributes: &[opt("Text")],
                    children: &[maybe(leaf(
                        "Button",
                        &[opt("Text"), opt("KeyCode")],
                    ))],
                }),
            ],
        }),
    ],
};

/// `MSI`: current menu and its items.
pub static MENU_INFO: ElementSpec = ElementSpec {
    name: "MSI",
    attributes: &[
        req("Name"),
        req("Index"),
        req("MenuType"),
        opt("Value"),
        opt("Selected"),
    ],
    children: &[
        many(leaf("MenuItem", &[req("Name"), req("Index")])),
        one(FOOTER),
    ],
};

pub static GLT_FAVORITES: ElementSpec = glt_list!(leaf(
    "FL",
    &[
        req("Index"),
        req("Name"),
        opt("Monitor"),
        opt("Q_Key"),
        opt("N_Tag"),
    ],
));

pub static GLT_SYSTEMS: ElementSpec = glt_list!(leaf(
    "SYS",
    &[
        req("Index"),
        opt("TrunkId"),
        req("Name"),
        opt("Avoid"),
        opt("Type"),
        opt("Q_Key"),
        opt("N_Tag"),
    ],
));

pub static GLT_DEPARTMENTS: ElementSpec = glt_list!(leaf(
    "DEPT",
    &[
        req("Index"),
        opt("TGroupId"),
        req("Name"),
        opt("Avoid"),
        opt("Q_Key"),
    ],
));

pub static GLT_SITES: ElementSpec = glt_list!(leaf(
    "SITE",
    &[
        req("Index"),
        opt("SiteId"),
        req("Name"),
        opt("Avoid"),
        opt("Q_Key"),
    ],
));

pub static GLT_TONE_OUTS: ElementSpec = glt_list!(leaf(
    "FTO",
    &[
        req("Index"),
        req("Freq"),
        opt("Mod"),
        opt("Name"),
        opt("ToneA"),
        opt("ToneB"),
    ],
));

pub static GLT_SEARCH_BANKS: ElementSpec = glt_list!(leaf(
    "CS_BANK",
    &[
        req("Index"),
        req("Name"),
        opt("Lower"),
        opt("Upper"),
        opt("Mod"),
        opt("Step"),
    ],
));

pub static GLT_RECORDING_FOLDERS: ElementSpec =
    glt_list!(leaf("UREC_FOLDER", &[req("Index"), req("Name")]));

pub static GLT_TRUNK_DISCOVERY: ElementSpec = glt_list!(leaf(
    "TRN_DISCOV",
    &[
        req("Name"),
        opt("Delay"),
        opt("Logging"),
        opt("Duration"),
        opt("CompareDB"),
        opt("SystemName"),
        opt("SystemType"),
        opt("SiteName"),
        opt("TimeOutTimer"),
        opt("AutoStore"),
    ],
));

pub static GLT_CONVENTIONAL_DISCOVERY: ElementSpec = glt_list!(leaf(
    "CNV_DISCOV",
    &[
        req("Name"),
        opt("Lower"),
        opt("Upper"),
        opt("Mod"),
        opt("Step"),
        opt("Delay"),
        opt("Logging"),
        opt("CompareDB"),
        opt("Duration"),
        opt("TimeOutTimer"),
        opt("AutoStore"),
    ],
));

/// Built-in schema for a message kind.
///
/// `STS`, `GLG`, unrecognized `GLT` lists and unlisted type codes have no
/// schema; they are checked for well-formed XML only.
pub fn builtin_schema(kind: MessageKind) -> Option<&'static ElementSpec> {
    match kind {
        MessageKind::Gsi | MessageKind::Psi => Some(&SCANNER_INFO),
        MessageKind::Msi => Some(&MENU_INFO),
        MessageKind::Sts | MessageKind::Glg | MessageKind::Other(_) => None,
        MessageKind::Glt(subtype) => match subtype {
            GltSubtype::Fl => Some(&GLT_FAVORITES),
            GltSubtype::Sys => Some(&GLT_SYSTEMS),
            GltSubtype::Dept => Some(&GLT_DEPARTMENTS),
            GltSubtype::Site => Some(&GLT_SITES),
            GltSubtype::Fto => Some(&GLT_TONE_OUTS),
            GltSubtype::CsBank => Some(&GLT_SEARCH_BANKS),
            GltSubtype::UrecFolder => Some(&GLT_RECORDING_FOLDERS),
            GltSubtype::TrnDiscov => Some(&GLT_TRUNK_DISCOVERY),
            GltSubtype::CnvDiscov => Some(&GLT_CONVENTIONAL_DISCOVERY),
            GltSubtype::Unknown => None,
        },
    }
}
