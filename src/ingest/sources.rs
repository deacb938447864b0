// src/ingest/sources.rs
use super::types::Source;

/// Trusted scholarship sites, fetched in this order every pass.
pub const TRUSTED_SOURCES: &[Source] = &[
    Source {
        name: "National Scholarship Portal",
        url: "https://scholarships.gov.in/",
    },
    Source {
        name: "Buddy4Study",
        url: "https://www.buddy4study.com/scholarships/",
    },
    Source {
        name: "AICTE",
        url: "https://www.aicte-india.org/schemes/students-development-schemes",
    },
    Source {
        name: "UGC Scholarships",
        url: "https://www.ugc.ac.in/page/Scholarships-and-Fellowships.aspx",
    },
    Source {
        name: "DBT India",
        url: "http://dbtindia.gov.in/schemes-programmes/building-young-careers/scholarships",
    },
];
