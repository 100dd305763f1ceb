// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 拦截检测（block_detector）：将抓取结果分类为正常页、验证码页、中间页或抓取失败
/// - 列表提取（listing_extractor）：从类目列表页提取商品链接
/// - 分页（paginator）：按策略链计算下一页
/// - 详情提取（detail_extractor）：提取商品标题、价格和货币
/// - 诊断（diagnostics）：失败页面的收集接口
/// - 爬取服务（crawl_service）：类目遍历与详情批量抓取的编排
pub mod block_detector;
pub mod crawl_service;
pub mod detail_extractor;
pub mod diagnostics;
pub mod listing_extractor;
pub mod paginator;
