pub mod consts {
    pub mod consts;
}

pub mod model {
    pub mod activity;
    pub mod statement;
}

pub mod directory {
    pub mod commands;
    pub mod directory;
    pub mod options;
    pub mod request_manager;
    pub mod seed;

    pub mod table {
        pub mod row;
        pub mod table;
    }
}
