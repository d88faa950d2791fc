pub mod config;

pub mod domain {
    pub mod errors;
    pub mod external_apis {
        pub mod http;
    }
    pub mod models {
        pub mod report;
        pub mod repository;
    }
}

pub mod application {
    pub mod services {
        pub mod endpoints;
        pub mod paginator;
    }
    pub mod use_cases {
        pub mod build_commit_report;
        pub mod count_commits;
        pub mod list_repositories;
    }
}

pub mod infrastructures {
    pub mod adapters {
        pub mod primary {
            pub mod cli;
        }
        pub mod secondary {
            pub mod external_apis {
                pub mod github;
            }
        }
    }
}

#[cfg(test)]
mod testing;
