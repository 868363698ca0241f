// 电影搜索与观影记录库
//
// 本库提供：
// - OMDb 搜索与详情查询（带缓存）
// - 可取消的搜索控制器
// - 本地持久化的已观看列表
// - 选中/评分流程

pub mod config;
pub mod external;
pub mod models;
pub mod services;
