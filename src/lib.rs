// 影片数据可视化后端库
//
// 本库提供影片数据服务的核心功能，包括：
// - API 路由
// - 纯查询引擎（筛选、排序、分页、图表缩放）
// - 数据集快照管理
// - 维基百科抓取管线
// - 数据库操作

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod api;
pub mod config;
pub mod database;
pub mod dataset;
pub mod engine;
pub mod external;
pub mod models;
pub mod services;
