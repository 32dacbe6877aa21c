//! 历书缓存管理
//! 处理历书的本地序列化（MessagePack）与反序列化，以及"缓存优先、JSON兜底"的加载流程

use std::path::Path;
use rmp_serde::{Serializer, from_slice};
use serde::Serialize;
use tracing::{debug, warn};

use super::almanac::{AlmanacData, AlmanacProvider};
use crate::error::PreceptResult;

/// 历书缓存管理器
pub struct AlmanacCache;

impl AlmanacCache {
    /// 从本地缓存加载历书
    pub async fn load(cache_path: &Path) -> PreceptResult<AlmanacData> {
        let cache_data = tokio::fs::read(cache_path).await?;

        let data: AlmanacData = from_slice(&cache_data)?;

        debug!("历书缓存反序列化成功，日数：{}，农历月数：{}", data.days.len(), data.months.len());
        Ok(data)
    }

    /// 将历书写入本地缓存
    pub async fn save(cache_path: &Path, data: &AlmanacData) -> PreceptResult<()> {
        let mut cache_data = Vec::new();
        // 可选字段会被跳过，结构体必须按map编码
        data.serialize(&mut Serializer::new(&mut cache_data).with_struct_map())?;

        debug!("历书序列化成功，序列化后数据大小：{} 字节", cache_data.len());

        tokio::fs::write(cache_path, cache_data).await?;
        Ok(())
    }

    /// 清除本地缓存
    pub async fn clear(cache_path: &Path) -> PreceptResult<()> {
        if tokio::fs::try_exists(cache_path).await? {
            tokio::fs::remove_file(cache_path).await?;
        }
        Ok(())
    }
}

/// 历书加载器
pub struct AlmanacLoader;

impl AlmanacLoader {
    /// 按扩展名加载：`.mp` 视为MessagePack缓存，其余按JSON解析
    pub async fn load(path: &Path) -> PreceptResult<AlmanacProvider> {
        let data = if Self::is_msgpack(path) {
            AlmanacCache::load(path).await?
        } else {
            let json = tokio::fs::read_to_string(path).await?;
            serde_json::from_str(&json)?
        };
        AlmanacProvider::from_data(data)
    }

    /// 优先读取缓存，缓存缺失或损坏时解析JSON源并回写缓存
    pub async fn load_with_cache(source: &Path, cache_path: &Path) -> PreceptResult<AlmanacProvider> {
        match AlmanacCache::load(cache_path).await {
            Ok(data) => {
                debug!("从本地缓存加载历书成功");
                return AlmanacProvider::from_data(data);
            }
            Err(e) => warn!("历书缓存不可用（{}），将解析源文件：{}", e, source.display()),
        }

        let provider = Self::load(source).await?;

        if let Err(e) = AlmanacCache::save(cache_path, provider.data()).await {
            warn!("历书缓存写入失败：{}", e);
        } else {
            debug!("历书已缓存到本地：{}", cache_path.display());
        }

        Ok(provider)
    }

    fn is_msgpack(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp"))
    }
}
