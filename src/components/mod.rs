pub mod locker_wall;
